//! Single rich-text sections: the six generic résumé sections and the cover
//! letter share one shape and one settle rule.

use crate::forms::{project_plain_text, FieldError, Section};
use crate::models::document::{CoverLetterDocument, DescriptionSection, ResumeDocument, SectionKind};

fn settle_description(draft: &DescriptionSection) -> DescriptionSection {
    DescriptionSection {
        description: draft.description.clone(),
        description_text: project_plain_text(&draft.description),
    }
}

/// Skills, Languages, Volunteer, Interests, Awards or References.
pub struct GenericSection(pub SectionKind);

impl Section for GenericSection {
    type Doc = ResumeDocument;
    type Draft = DescriptionSection;

    fn name(&self) -> &'static str {
        self.0.key()
    }

    fn mount(&self, doc: &ResumeDocument) -> DescriptionSection {
        doc.description_section(self.0).cloned().unwrap_or_default()
    }

    fn settle(&self, draft: &DescriptionSection, _: &DescriptionSection, _: &[FieldError]) -> DescriptionSection {
        settle_description(draft)
    }

    fn commit(&self, doc: &mut ResumeDocument, settled: DescriptionSection) {
        *doc.description_section_mut(self.0) = Some(settled);
    }
}

pub struct CoverLetterSection;

impl Section for CoverLetterSection {
    type Doc = CoverLetterDocument;
    type Draft = DescriptionSection;

    fn name(&self) -> &'static str {
        "cover-letter"
    }

    fn mount(&self, doc: &CoverLetterDocument) -> DescriptionSection {
        doc.clone()
    }

    fn settle(&self, draft: &DescriptionSection, _: &DescriptionSection, _: &[FieldError]) -> DescriptionSection {
        settle_description(draft)
    }

    fn commit(&self, doc: &mut CoverLetterDocument, settled: DescriptionSection) {
        *doc = settled;
    }
}
