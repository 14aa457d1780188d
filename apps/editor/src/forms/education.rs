use crate::forms::items::{ArrayItem, ItemList};
use crate::forms::{check_date_order, project_plain_text, settle_items, FieldError, Section};
use crate::models::dates::EndDate;
use crate::models::document::{Education, ResumeDocument};

const MIN_LEN: usize = 2;

impl ArrayItem for Education {
    fn blank() -> Self {
        let empty = || Some(String::new());
        Education {
            institution: empty(),
            area: empty(),
            study_type: empty(),
            start_date: None,
            end_date: EndDate::EndedUnspecified,
            score: empty(),
            courses: empty(),
            description_text: None,
        }
    }

    fn end_date_mut(&mut self) -> &mut EndDate {
        &mut self.end_date
    }
}

pub struct EducationSection;

impl Section for EducationSection {
    type Doc = ResumeDocument;
    type Draft = ItemList<Education>;

    fn name(&self) -> &'static str {
        "education"
    }

    fn mount(&self, doc: &ResumeDocument) -> Self::Draft {
        ItemList::mount(doc.education.clone().unwrap_or_default())
    }

    fn validate(&self, draft: &Self::Draft) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for k in draft.items() {
            let item = &k.value;
            if too_short(&item.institution) {
                errors.push(FieldError::for_item(k.id, "institution", "Institution name is too short"));
            }
            if too_short(&item.area) {
                errors.push(FieldError::for_item(k.id, "area", "Field of study is required"));
            }
            errors.extend(check_date_order(k.id, item.start_date, item.end_date));
        }
        errors
    }

    fn settle(&self, draft: &Self::Draft, last_valid: &Self::Draft, errors: &[FieldError]) -> Self::Draft {
        settle_items(
            draft,
            last_valid,
            errors,
            |item, fallback, field| match field {
                "institution" => item.institution = fallback.institution.clone(),
                "area" => item.area = fallback.area.clone(),
                "endDate" => item.end_date = fallback.end_date,
                _ => {}
            },
            |item| item.description_text = project_plain_text(&item.courses),
        )
    }

    fn commit(&self, doc: &mut ResumeDocument, settled: Self::Draft) {
        doc.education = Some(settled.values());
    }
}

fn too_short(value: &Option<String>) -> bool {
    value.as_deref().map_or(0, |s| s.chars().count()) < MIN_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_item_flags_required_fields() {
        let mut list: ItemList<Education> = ItemList::default();
        list.append_blank();
        let fields: Vec<_> = EducationSection
            .validate(&list)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["institution", "area"]);
    }

    #[test]
    fn test_two_characters_is_enough() {
        let mut list: ItemList<Education> = ItemList::default();
        let id = list.append_blank();
        let item = list.get_mut(id).unwrap();
        item.institution = Some("MIT".into());
        item.area = Some("CS".into());
        assert!(EducationSection.validate(&list).is_empty());
    }

    #[test]
    fn test_settle_reverts_only_invalid_fields() {
        let mut last_valid: ItemList<Education> = ItemList::default();
        let id = last_valid.append_blank();
        {
            let item = last_valid.get_mut(id).unwrap();
            item.institution = Some("Oxford".into());
            item.area = Some("Maths".into());
        }

        let mut draft = last_valid.clone();
        {
            let item = draft.get_mut(id).unwrap();
            item.institution = Some("O".into());
            item.score = Some("First".into());
            item.courses = Some("<ul><li>Analysis</li></ul>".into());
        }

        let errors = EducationSection.validate(&draft);
        let settled = EducationSection.settle(&draft, &last_valid, &errors);
        let item = settled.get(id).unwrap();
        assert_eq!(item.institution.as_deref(), Some("Oxford"));
        assert_eq!(item.score.as_deref(), Some("First"));
        assert_eq!(item.description_text.as_deref(), Some("Analysis"));
    }
}
