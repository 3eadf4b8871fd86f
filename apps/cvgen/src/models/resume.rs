use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// The parsed résumé. Built once by the loader and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumeRecord {
    pub name: String,
    pub title: String,
    pub contact: Contact,
    pub profile: Profile,
    pub skills: Vec<SkillEntry>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    /// `None` when the key is absent: the whole section is skipped.
    #[serde(default)]
    pub certifications: Option<Vec<Certification>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub location: String,
    /// Overrides the configured GitHub link target.
    #[serde(default)]
    pub github: Option<String>,
    /// Overrides the configured LinkedIn link target.
    #[serde(default)]
    pub linkedin: Option<String>,
}

/// Either a single paragraph or a structured summary with focus areas and a goal.
/// Resolved once here so the layout never has to inspect the raw shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Profile {
    Structured(StructuredProfile),
    PlainText(String),
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ProfileVisitor)
    }
}

struct ProfileVisitor;

impl<'de> Visitor<'de> for ProfileVisitor {
    type Value = Profile;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a profile paragraph or a mapping with summary, focus and current_goal")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Profile, E> {
        Ok(Profile::PlainText(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Profile, E> {
        Ok(Profile::PlainText(v))
    }

    // `profile:` with nothing after it
    fn visit_unit<E: de::Error>(self) -> Result<Profile, E> {
        Ok(Profile::Structured(StructuredProfile::default()))
    }

    fn visit_map<A>(self, map: A) -> Result<Profile, A::Error>
    where
        A: MapAccess<'de>,
    {
        StructuredProfile::deserialize(de::value::MapAccessDeserializer::new(map))
            .map(Profile::Structured)
    }
}

/// Every key is optional; a key present with no value reads the same as a missing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuredProfile {
    #[serde(default, deserialize_with = "optional_text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub focus: Vec<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub current_goal: Option<String>,
}

impl StructuredProfile {
    /// The goal text, treating an empty or blank goal as absent.
    pub fn goal(&self) -> Option<&str> {
        self.current_goal
            .as_deref()
            .filter(|g| !g.trim().is_empty())
    }

    pub fn has_columns(&self) -> bool {
        !self.focus.is_empty() || self.goal().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillEntry {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub graduation: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperienceEntry {
    pub title: String,
    pub period: String,
    pub bullets: Vec<String>,
}

/// A certification is written either as a bare string or as a `[title, date]` pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Certification {
    Plain(String),
    Dated { title: String, date: String },
}

impl<'de> Deserialize<'de> for Certification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(CertificationVisitor)
    }
}

struct CertificationVisitor;

impl<'de> Visitor<'de> for CertificationVisitor {
    type Value = Certification;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a certification string or a [title, date] pair")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Certification, E> {
        ScalarTextVisitor.visit_str(v).map(Certification::Plain)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Certification, E> {
        ScalarTextVisitor.visit_string(v).map(Certification::Plain)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Certification, E> {
        ScalarTextVisitor.visit_u64(v).map(Certification::Plain)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Certification, E> {
        ScalarTextVisitor.visit_i64(v).map(Certification::Plain)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Certification, E> {
        ScalarTextVisitor.visit_f64(v).map(Certification::Plain)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Certification, E> {
        ScalarTextVisitor.visit_bool(v).map(Certification::Plain)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Certification, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let title: ScalarText = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let date: ScalarText = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(3, &self));
        }
        Ok(Certification::Dated {
            title: title.0,
            date: date.0,
        })
    }
}

/// Any scalar (string, integer, float, bool) read as its text form.
/// Used wherever the field sits behind `deserialize_any`, where a bare year arrives as an integer.
struct ScalarText(String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarTextVisitor).map(ScalarText)
    }
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ScalarText>::deserialize(deserializer)?.map(|t| t.0))
}

fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<ScalarText>>::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().map(|t| t.0).collect())
}

struct ScalarTextVisitor;

impl<'de> Visitor<'de> for ScalarTextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }
}
