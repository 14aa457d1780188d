use crate::forms::items::{ArrayItem, ItemList};
use crate::forms::{check_date_order, project_plain_text, settle_items, FieldError, Section};
use crate::models::dates::EndDate;
use crate::models::document::{ResumeDocument, WorkExperience};

impl ArrayItem for WorkExperience {
    fn blank() -> Self {
        let empty = || Some(String::new());
        WorkExperience {
            name: empty(),
            position: empty(),
            city: empty(),
            country: empty(),
            start_date: None,
            end_date: EndDate::EndedUnspecified,
            description: empty(),
            description_text: None,
        }
    }

    fn end_date_mut(&mut self) -> &mut EndDate {
        &mut self.end_date
    }
}

pub struct WorkExperienceSection;

impl Section for WorkExperienceSection {
    type Doc = ResumeDocument;
    type Draft = ItemList<WorkExperience>;

    fn name(&self) -> &'static str {
        "work-experience"
    }

    fn mount(&self, doc: &ResumeDocument) -> Self::Draft {
        ItemList::mount(doc.work_experiences.clone().unwrap_or_default())
    }

    fn validate(&self, draft: &Self::Draft) -> Vec<FieldError> {
        draft
            .items()
            .iter()
            .filter_map(|k| check_date_order(k.id, k.value.start_date, k.value.end_date))
            .collect()
    }

    fn settle(&self, draft: &Self::Draft, last_valid: &Self::Draft, errors: &[FieldError]) -> Self::Draft {
        settle_items(
            draft,
            last_valid,
            errors,
            |item, fallback, field| {
                if field == "endDate" {
                    item.end_date = fallback.end_date;
                }
            },
            |item| item.description_text = project_plain_text(&item.description),
        )
    }

    fn commit(&self, doc: &mut ResumeDocument, settled: Self::Draft) {
        doc.work_experiences = Some(settled.values());
    }
}
