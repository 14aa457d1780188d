use crate::forms::{FieldError, Section};
use crate::models::document::{PersonalInfo, ResumeDocument};

/// Name, contact, location, summary and socials. Every field is optional free
/// text, so nothing here ever fails validation.
pub struct PersonalInfoSection;

impl Section for PersonalInfoSection {
    type Doc = ResumeDocument;
    type Draft = PersonalInfo;

    fn name(&self) -> &'static str {
        "personal-info"
    }

    fn mount(&self, doc: &ResumeDocument) -> PersonalInfo {
        doc.personal_info.clone().unwrap_or_else(PersonalInfo::blank)
    }

    fn settle(&self, draft: &PersonalInfo, _last_valid: &PersonalInfo, _errors: &[FieldError]) -> PersonalInfo {
        draft.clone()
    }

    fn commit(&self, doc: &mut ResumeDocument, settled: PersonalInfo) {
        doc.personal_info = Some(settled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_missing_personal_info_is_blank() {
        let draft = PersonalInfoSection.mount(&ResumeDocument::default());
        assert_eq!(draft, PersonalInfo::blank());
    }

    #[test]
    fn test_commit_leaves_other_sections() {
        let mut doc = ResumeDocument {
            id: Some("r1".into()),
            ..ResumeDocument::blank()
        };
        PersonalInfoSection.commit(
            &mut doc,
            PersonalInfo {
                email: Some("ada@example.com".into()),
                ..Default::default()
            },
        );
        assert_eq!(doc.id.as_deref(), Some("r1"));
        assert_eq!(
            doc.personal_info.unwrap().email.as_deref(),
            Some("ada@example.com")
        );
    }
}
