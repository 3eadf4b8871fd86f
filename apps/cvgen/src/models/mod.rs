pub mod resume;

pub use resume::{Certification, Contact, Profile, ResumeRecord, StructuredProfile};
