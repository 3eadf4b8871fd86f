//! Résumé → block sequence.
//!
//! Section order is fixed: header, profile, skills/education table, experience,
//! certifications (only when the input has the key). Every text field is copied
//! verbatim; the only decoration added here is bold runs, line breaks, the
//! "• " bullet prefix and the " — " separator.

use tracing::debug;

use crate::config::ProfileLinks;
use crate::layout::blocks::{LayoutBlock, RichText, Separator, TwoColumnTable};
use crate::layout::font_metrics::{PageConfig, MM};
use crate::layout::style::{Color, StyleRole, StyleSheet};
use crate::models::{Certification, Contact, Profile, ResumeRecord, StructuredProfile};

/// Horizontal space two-column tables give up to the page body.
pub const TABLE_GAP: f32 = 10.0;
pub const CELL_PADDING: f32 = 5.0;

const BULLET: &str = "• ";
const DASH: &str = " — ";

pub const PROFILE_HEADING: &str = "PROFILE";
pub const SKILLS_HEADING: &str = "KEY SKILLS";
pub const EDUCATION_HEADING: &str = "EDUCATION";
pub const EXPERIENCE_HEADING: &str = "PROJECTS & EXPERIENCE";
pub const CERTIFICATIONS_HEADING: &str = "CERTIFICATIONS";

/// Width of each column of a two-column table spanning the page body.
pub fn column_width(page: &PageConfig) -> f32 {
    (page.body_width() - TABLE_GAP) / 2.0
}

/// Link targets for the contact line: values in the input win over configuration.
pub fn resolve_links(contact: &Contact, configured: &ProfileLinks) -> ProfileLinks {
    ProfileLinks {
        github: contact
            .github
            .clone()
            .unwrap_or_else(|| configured.github.clone()),
        linkedin: contact
            .linkedin
            .clone()
            .unwrap_or_else(|| configured.linkedin.clone()),
    }
}

/// Builds the complete ordered block sequence for one résumé.
pub fn build_story(
    record: &ResumeRecord,
    styles: &StyleSheet,
    page: &PageConfig,
    links: &ProfileLinks,
) -> Vec<LayoutBlock> {
    let builder = StoryBuilder {
        styles,
        page,
        col_width: column_width(page),
    };

    let mut story = Vec::new();
    builder.header(&mut story, record, links);
    builder.profile(&mut story, &record.profile);
    story.push(builder.skills_and_education(record));
    builder.experience(&mut story, record);
    if let Some(certs) = &record.certifications {
        builder.certifications(&mut story, certs);
    }

    debug!(blocks = story.len(), "Built layout story");
    story
}

struct StoryBuilder<'a> {
    styles: &'a StyleSheet,
    page: &'a PageConfig,
    col_width: f32,
}

impl StoryBuilder<'_> {
    fn header(&self, story: &mut Vec<LayoutBlock>, record: &ResumeRecord, links: &ProfileLinks) {
        story.push(LayoutBlock::paragraph(StyleRole::Name, record.name.as_str()));
        story.push(LayoutBlock::paragraph(
            StyleRole::Subtitle,
            record.title.as_str(),
        ));

        let c = &record.contact;
        let contact_line = RichText::new()
            .text(format!("{} | {} | {}", c.phone, c.email, c.location))
            .line_break()
            .link("GitHub", links.github.as_str())
            .text(" | ")
            .link("LinkedIn", links.linkedin.as_str());
        story.push(LayoutBlock::paragraph(StyleRole::Contact, contact_line));
        story.push(LayoutBlock::Spacer(6.0 * MM));

        story.push(LayoutBlock::Spacer(2.0 * MM));
        story.push(LayoutBlock::Separator(Separator {
            width: self.page.body_width(),
            height: 1.0,
            color: self.styles.palette.text,
        }));
        story.push(LayoutBlock::Spacer(2.0 * MM));
    }

    fn profile(&self, story: &mut Vec<LayoutBlock>, profile: &Profile) {
        story.push(heading(PROFILE_HEADING));

        match profile {
            Profile::PlainText(text) => story.push(body(text.as_str())),
            Profile::Structured(p) => {
                if let Some(summary) = &p.summary {
                    story.push(body(summary.as_str()));
                    story.push(LayoutBlock::Spacer(2.0 * MM));
                }
                if p.has_columns() {
                    story.push(self.profile_columns(p));
                }
            }
        }
    }

    fn profile_columns(&self, p: &StructuredProfile) -> LayoutBlock {
        let mut left = Vec::new();
        if !p.focus.is_empty() {
            left.push(body(RichText::new().bold("Focus Areas:")));
            left.extend(p.focus.iter().map(|item| bullet(item)));
            left.push(LayoutBlock::Spacer(1.0 * MM));
        }

        let mut right = Vec::new();
        if let Some(goal) = p.goal() {
            right.push(body(RichText::new().bold("Current Goal:")));
            right.push(body(goal));
            right.push(LayoutBlock::Spacer(1.0 * MM));
        }

        self.table(
            or_placeholder(left),
            or_placeholder(right),
            self.styles.palette.primary,
        )
    }

    fn skills_and_education(&self, record: &ResumeRecord) -> LayoutBlock {
        let mut skills = vec![heading(SKILLS_HEADING)];
        for entry in &record.skills {
            skills.push(body(
                RichText::new()
                    .bold(format!("{}:", entry.category))
                    .text(format!(" {}", entry.items.join(", "))),
            ));
        }
        skills.push(LayoutBlock::Spacer(3.0 * MM));

        let mut education = vec![heading(EDUCATION_HEADING)];
        for edu in &record.education {
            education.push(body(
                RichText::new()
                    .bold(edu.degree.as_str())
                    .line_break()
                    .text(format!("{}{DASH}{}", edu.institution, edu.graduation)),
            ));
            education.extend(edu.notes.iter().map(|note| bullet(note)));
            education.push(LayoutBlock::Spacer(2.0 * MM));
        }
        education.push(LayoutBlock::Spacer(3.0 * MM));

        self.table(skills, education, self.styles.palette.text)
    }

    fn experience(&self, story: &mut Vec<LayoutBlock>, record: &ResumeRecord) {
        story.push(heading(EXPERIENCE_HEADING));
        for exp in &record.experience {
            story.push(body(
                RichText::new()
                    .bold(exp.title.as_str())
                    .text(format!("{DASH}{}", exp.period)),
            ));
            story.extend(exp.bullets.iter().map(|b| bullet(b)));
            story.push(LayoutBlock::Spacer(3.0 * MM));
        }
    }

    fn certifications(&self, story: &mut Vec<LayoutBlock>, certs: &[Certification]) {
        story.push(heading(CERTIFICATIONS_HEADING));
        for cert in certs {
            story.push(match cert {
                Certification::Dated { title, date } => body(
                    RichText::new()
                        .bold(title.as_str())
                        .text(format!("{DASH}{date}")),
                ),
                Certification::Plain(text) => bullet(text),
            });
        }
    }

    fn table(
        &self,
        left: Vec<LayoutBlock>,
        right: Vec<LayoutBlock>,
        divider: Color,
    ) -> LayoutBlock {
        LayoutBlock::Columns(TwoColumnTable {
            left,
            right,
            col_width: self.col_width,
            padding: CELL_PADDING,
            divider,
            background: self.styles.palette.background,
        })
    }
}

fn heading(text: &str) -> LayoutBlock {
    LayoutBlock::paragraph(StyleRole::SectionHeading, text)
}

fn body(content: impl Into<RichText>) -> LayoutBlock {
    LayoutBlock::paragraph(StyleRole::Body, content)
}

fn bullet(text: &str) -> LayoutBlock {
    body(format!("{BULLET}{text}").as_str())
}

/// An empty column still needs a cell: a 1 mm spacer stands in.
fn or_placeholder(column: Vec<LayoutBlock>) -> Vec<LayoutBlock> {
    if column.is_empty() {
        vec![LayoutBlock::Spacer(1.0 * MM)]
    } else {
        column
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::Inline;
    use crate::layout::font_metrics::default_page_config;
    use crate::layout::style::{create_styles, PALETTE};
    use crate::models::resume::{EducationEntry, ExperienceEntry, SkillEntry};

    fn make_record(profile: Profile, certifications: Option<Vec<Certification>>) -> ResumeRecord {
        ResumeRecord {
            name: "Jane Doe".to_string(),
            title: "Systems Engineer".to_string(),
            contact: Contact {
                phone: "0115550100".to_string(),
                email: "jane@example.com".to_string(),
                location: "Johannesburg".to_string(),
                github: None,
                linkedin: None,
            },
            profile,
            skills: vec![SkillEntry {
                category: "Languages".to_string(),
                items: vec!["Python".to_string(), "Go".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "BSc Computer Science".to_string(),
                institution: "Wits".to_string(),
                graduation: "2024".to_string(),
                notes: vec!["Distinction".to_string()],
            }],
            experience: vec![ExperienceEntry {
                title: "Homelab".to_string(),
                period: "2023 - Present".to_string(),
                bullets: vec!["Runs a cluster".to_string(), "Automates backups".to_string()],
            }],
            certifications,
        }
    }

    fn build(record: &ResumeRecord) -> Vec<LayoutBlock> {
        let styles = create_styles(PALETTE);
        let page = default_page_config();
        build_story(record, &styles, &page, &ProfileLinks::default())
    }

    fn headings(story: &[LayoutBlock]) -> Vec<String> {
        story
            .iter()
            .filter_map(|b| b.text_in_role(StyleRole::SectionHeading))
            .collect()
    }

    fn tables(story: &[LayoutBlock]) -> Vec<&TwoColumnTable> {
        story
            .iter()
            .filter_map(|b| match b {
                LayoutBlock::Columns(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn position<F: Fn(&LayoutBlock) -> bool>(story: &[LayoutBlock], pred: F) -> usize {
        story.iter().position(pred).expect("block not found")
    }

    fn structured(summary: Option<&str>, focus: &[&str], goal: Option<&str>) -> Profile {
        Profile::Structured(StructuredProfile {
            summary: summary.map(str::to_string),
            focus: focus.iter().map(|s| s.to_string()).collect(),
            current_goal: goal.map(str::to_string),
        })
    }

    #[test]
    fn test_section_order_is_fixed() {
        let record = make_record(
            structured(Some("Summary"), &["Linux"], Some("SRE")),
            Some(vec![Certification::Plain("AWS".to_string())]),
        );
        let story = build(&record);

        let name = position(&story, |b| b.text_in_role(StyleRole::Name).is_some());
        let profile = position(&story, |b| {
            b.text_in_role(StyleRole::SectionHeading).as_deref() == Some(PROFILE_HEADING)
        });
        let skills_table = story
            .iter()
            .rposition(|b| matches!(b, LayoutBlock::Columns(_)))
            .unwrap();
        let experience = position(&story, |b| {
            b.text_in_role(StyleRole::SectionHeading).as_deref() == Some(EXPERIENCE_HEADING)
        });
        let certs = position(&story, |b| {
            b.text_in_role(StyleRole::SectionHeading).as_deref() == Some(CERTIFICATIONS_HEADING)
        });

        assert!(name < profile);
        assert!(profile < skills_table);
        assert!(skills_table < experience);
        assert!(experience < certs);
        assert_eq!(
            headings(&story),
            vec![PROFILE_HEADING, EXPERIENCE_HEADING, CERTIFICATIONS_HEADING]
        );
    }

    #[test]
    fn test_header_blocks() {
        let story = build(&make_record(Profile::PlainText("p".to_string()), None));

        assert_eq!(story[0].text_in_role(StyleRole::Name).as_deref(), Some("Jane Doe"));
        assert_eq!(
            story[1].text_in_role(StyleRole::Subtitle).as_deref(),
            Some("Systems Engineer")
        );
        assert_eq!(
            story[2].text_in_role(StyleRole::Contact).as_deref(),
            Some("0115550100 | jane@example.com | Johannesburg\nGitHub | LinkedIn")
        );
        assert!(matches!(story[3], LayoutBlock::Spacer(_)));
        assert!(matches!(story[4], LayoutBlock::Spacer(_)));
        match &story[5] {
            LayoutBlock::Separator(sep) => {
                assert!((sep.width - default_page_config().body_width()).abs() < 1e-3);
                assert_eq!(sep.color, PALETTE.text);
            }
            other => panic!("expected separator, got {other:?}"),
        }
        assert!(matches!(story[6], LayoutBlock::Spacer(_)));
    }

    #[test]
    fn test_contact_links_point_to_resolved_urls() {
        let mut record = make_record(Profile::PlainText("p".to_string()), None);
        record.contact.github = Some("https://github.com/jane".to_string());
        let links = resolve_links(&record.contact, &ProfileLinks::default());
        let story = build_story(
            &record,
            &create_styles(PALETTE),
            &default_page_config(),
            &links,
        );

        let LayoutBlock::Text(contact) = &story[2] else {
            panic!("expected contact text block");
        };
        let urls: Vec<&str> = contact
            .content
            .runs
            .iter()
            .filter_map(|r| match r {
                Inline::Link { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            urls,
            vec!["https://github.com/jane", crate::config::DEFAULT_LINKEDIN_URL]
        );
    }

    #[test]
    fn test_plain_text_profile_is_single_paragraph_without_table() {
        let story = build(&make_record(
            Profile::PlainText("Just me.".to_string()),
            None,
        ));
        let heading_idx = position(&story, |b| {
            b.text_in_role(StyleRole::SectionHeading).as_deref() == Some(PROFILE_HEADING)
        });

        assert_eq!(
            story[heading_idx + 1].text_in_role(StyleRole::Body).as_deref(),
            Some("Just me.")
        );
        // Only the skills/education table remains.
        assert_eq!(tables(&story).len(), 1);
        assert!(matches!(story[heading_idx + 2], LayoutBlock::Columns(_)));
    }

    #[test]
    fn test_goal_only_profile_has_placeholder_left_column() {
        let story = build(&make_record(structured(None, &[], Some("Ship it")), None));
        let all = tables(&story);
        assert_eq!(all.len(), 2);

        let profile_table = all[0];
        assert_eq!(profile_table.divider, PALETTE.primary);
        assert_eq!(profile_table.left, vec![LayoutBlock::Spacer(1.0 * MM)]);
        let right: Vec<String> = profile_table
            .right
            .iter()
            .filter_map(|b| b.text_in_role(StyleRole::Body))
            .collect();
        assert_eq!(right, vec!["Current Goal:", "Ship it"]);
    }

    #[test]
    fn test_focus_items_are_bulleted() {
        let story = build(&make_record(structured(None, &["Linux", "Networking"], None), None));
        let profile_table = tables(&story)[0];
        let left: Vec<String> = profile_table
            .left
            .iter()
            .filter_map(|b| b.text_in_role(StyleRole::Body))
            .collect();
        assert_eq!(left, vec!["Focus Areas:", "• Linux", "• Networking"]);
        assert_eq!(profile_table.right, vec![LayoutBlock::Spacer(1.0 * MM)]);
    }

    #[test]
    fn test_empty_structured_profile_renders_heading_only() {
        let story = build(&make_record(structured(None, &[], None), None));
        let heading_idx = position(&story, |b| {
            b.text_in_role(StyleRole::SectionHeading).as_deref() == Some(PROFILE_HEADING)
        });
        // Next block is straight away the skills/education table.
        assert!(matches!(story[heading_idx + 1], LayoutBlock::Columns(_)));
        assert_eq!(tables(&story).len(), 1);
    }

    #[test]
    fn test_summary_without_columns_has_no_table() {
        let story = build(&make_record(structured(Some("Summary"), &[], Some("  ")), None));
        let heading_idx = position(&story, |b| {
            b.text_in_role(StyleRole::SectionHeading).as_deref() == Some(PROFILE_HEADING)
        });
        assert_eq!(
            story[heading_idx + 1].text_in_role(StyleRole::Body).as_deref(),
            Some("Summary")
        );
        assert_eq!(tables(&story).len(), 1);
    }

    #[test]
    fn test_no_certifications_key_means_no_heading() {
        let story = build(&make_record(Profile::PlainText("p".to_string()), None));
        assert!(!headings(&story).contains(&CERTIFICATIONS_HEADING.to_string()));
    }

    #[test]
    fn test_empty_certifications_list_keeps_heading() {
        let story = build(&make_record(Profile::PlainText("p".to_string()), Some(vec![])));
        assert_eq!(
            headings(&story).last().map(String::as_str),
            Some(CERTIFICATIONS_HEADING)
        );
    }

    #[test]
    fn test_certification_shapes_render_differently() {
        let story = build(&make_record(
            Profile::PlainText("p".to_string()),
            Some(vec![
                Certification::Dated {
                    title: "Linux+".to_string(),
                    date: "2024".to_string(),
                },
                Certification::Plain("AWS".to_string()),
            ]),
        ));
        let n = story.len();

        let LayoutBlock::Text(dated) = &story[n - 2] else {
            panic!("expected text block");
        };
        assert_eq!(dated.content.runs[0], Inline::Bold("Linux+".to_string()));
        assert_eq!(dated.content.plain_text(), "Linux+ — 2024");
        assert_eq!(
            story[n - 1].text_in_role(StyleRole::Body).as_deref(),
            Some("• AWS")
        );
    }

    #[test]
    fn test_skill_line_has_bold_category_and_joined_items() {
        let story = build(&make_record(Profile::PlainText("p".to_string()), None));
        let table = tables(&story)[0];

        assert_eq!(
            table.left[0].text_in_role(StyleRole::SectionHeading).as_deref(),
            Some(SKILLS_HEADING)
        );
        let LayoutBlock::Text(skill) = &table.left[1] else {
            panic!("expected skill line");
        };
        assert_eq!(
            skill.content.runs,
            vec![
                Inline::Bold("Languages:".to_string()),
                Inline::Text(" Python, Go".to_string()),
            ]
        );
        assert_eq!(table.divider, PALETTE.text);
    }

    #[test]
    fn test_education_column_layout() {
        let story = build(&make_record(Profile::PlainText("p".to_string()), None));
        let table = tables(&story)[0];

        assert_eq!(
            table.right[0].text_in_role(StyleRole::SectionHeading).as_deref(),
            Some(EDUCATION_HEADING)
        );
        assert_eq!(
            table.right[1].text_in_role(StyleRole::Body).as_deref(),
            Some("BSc Computer Science\nWits — 2024")
        );
        assert_eq!(
            table.right[2].text_in_role(StyleRole::Body).as_deref(),
            Some("• Distinction")
        );
        assert_eq!(table.right[3], LayoutBlock::Spacer(2.0 * MM));
        assert_eq!(table.right[4], LayoutBlock::Spacer(3.0 * MM));
    }

    #[test]
    fn test_experience_entries() {
        let story = build(&make_record(Profile::PlainText("p".to_string()), None));
        let idx = position(&story, |b| {
            b.text_in_role(StyleRole::SectionHeading).as_deref() == Some(EXPERIENCE_HEADING)
        });
        assert_eq!(
            story[idx + 1].text_in_role(StyleRole::Body).as_deref(),
            Some("Homelab — 2023 - Present")
        );
        assert_eq!(
            story[idx + 2].text_in_role(StyleRole::Body).as_deref(),
            Some("• Runs a cluster")
        );
        assert_eq!(
            story[idx + 3].text_in_role(StyleRole::Body).as_deref(),
            Some("• Automates backups")
        );
        assert_eq!(story[idx + 4], LayoutBlock::Spacer(3.0 * MM));
    }

    #[test]
    fn test_column_width_splits_body_evenly_minus_gap() {
        let page = default_page_config();
        let expected = (page.body_width() - 10.0) / 2.0;
        assert!((column_width(&page) - expected).abs() < 1e-4);
        for table in tables(&build(&make_record(
            structured(None, &["x"], None),
            None,
        ))) {
            assert!((table.col_width - expected).abs() < 1e-4);
            assert_eq!(table.padding, CELL_PADDING);
        }
    }
}
