// src/flows/wizard.rs

//! Guided finder: exam type → subject → learning styles → results.
//!
//! Steps advance only through their own action. `back` moves one step and
//! keeps every selection. Entering the results step issues a recommendation
//! ticket; a newer ticket, a reset or leaving the results step supersedes
//! any outstanding one.

use std::fmt;

use url::form_urlencoded;

use crate::error::{AppError, Result};
use crate::flows::{QueryTicket, RequestSequence, Ticket};
use crate::models::{ExamType, Instructor};
use crate::pipeline::SearchQuery;
use crate::utils::{join_tags, split_tags, toggle_tag};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    #[default]
    ExamSelect = 1,
    SubjectSelect = 2,
    StyleSelect = 3,
    Results = 4,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::ExamSelect => None,
            WizardStep::SubjectSelect => Some(WizardStep::ExamSelect),
            WizardStep::StyleSelect => Some(WizardStep::SubjectSelect),
            WizardStep::Results => Some(WizardStep::StyleSelect),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::ExamSelect => "exam select",
            WizardStep::SubjectSelect => "subject select",
            WizardStep::StyleSelect => "style select",
            WizardStep::Results => "results",
        };
        write!(f, "step {} ({name})", self.number())
    }
}

/// Selections accumulated by the finder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardSelection {
    pub exam_type: Option<ExamType>,
    pub subject: Option<String>,
    /// Selected learning styles, in selection order without duplicates.
    pub style_tags: Vec<String>,
    pub step: WizardStep,
}

impl WizardSelection {
    /// Recommendation query for the current selections.
    pub fn recommendation_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new().tags(self.style_tags.iter().cloned());
        if let Some(exam) = self.exam_type {
            query = query.exam(exam);
        }
        if let Some(subject) = &self.subject {
            query = query.subject(subject.clone());
        }
        query
    }
}

/// Navigation parameters that can resume the finder at the results step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub exam_type: Option<String>,
    pub subject: Option<String>,
    pub tags: Vec<String>,
}

impl DeepLink {
    /// Parse `examType=..&subject=..&tags=a,b`; a leading `?` is ignored.
    pub fn from_query(query: &str) -> Self {
        let mut link = DeepLink::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "examType" => link.exam_type = non_blank(&value),
                "subject" => link.subject = non_blank(&value),
                "tags" => link.tags = split_tags(Some(value.as_ref())),
                _ => {}
            }
        }
        link
    }

    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(exam) = &self.exam_type {
            serializer.append_pair("examType", exam);
        }
        if let Some(subject) = &self.subject {
            serializer.append_pair("subject", subject);
        }
        if let Some(tags) = join_tags(&self.tags) {
            serializer.append_pair("tags", &tags);
        }
        serializer.finish()
    }

    /// Whether the link carries enough to jump straight to results.
    pub fn is_complete(&self) -> bool {
        self.exam_type.is_some() && self.subject.is_some()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Finder state machine with its displayed recommendations.
#[derive(Debug)]
pub struct Wizard {
    selection: WizardSelection,
    sequence: RequestSequence,
    results: Vec<Instructor>,
    strict_deep_links: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Wizard {
    pub fn new(strict_deep_links: bool) -> Self {
        Self {
            selection: WizardSelection::default(),
            sequence: RequestSequence::new(),
            results: Vec::new(),
            strict_deep_links,
        }
    }

    pub fn selection(&self) -> &WizardSelection {
        &self.selection
    }

    pub fn step(&self) -> WizardStep {
        self.selection.step
    }

    pub fn results(&self) -> &[Instructor] {
        &self.results
    }

    fn expect_step(&self, step: WizardStep, action: &str) -> Result<()> {
        if self.selection.step != step {
            return Err(AppError::transition(format!(
                "{action} is not available at {}",
                self.selection.step
            )));
        }
        Ok(())
    }

    /// Step 1: choose the exam type and move to subject selection.
    pub fn select_exam(&mut self, exam: ExamType) -> Result<()> {
        self.expect_step(WizardStep::ExamSelect, "selecting an exam type")?;
        self.selection.exam_type = Some(exam);
        self.selection.step = WizardStep::SubjectSelect;
        Ok(())
    }

    /// Step 2: choose a subject offered for the selected exam type.
    pub fn select_subject(&mut self, subject: &str) -> Result<()> {
        self.expect_step(WizardStep::SubjectSelect, "selecting a subject")?;
        let exam = self
            .selection
            .exam_type
            .ok_or_else(|| AppError::transition("no exam type selected"))?;
        if !exam.offers_subject(subject) {
            return Err(AppError::validation(format!(
                "'{subject}' is not a {} subject",
                exam.label()
            )));
        }
        self.selection.subject = Some(subject.to_string());
        self.selection.step = WizardStep::StyleSelect;
        Ok(())
    }

    /// Step 3: toggle a learning style. Returns whether it is now selected.
    ///
    /// Blank tags are a `Validation` error and never count as a selection.
    pub fn toggle_tag(&mut self, tag: &str) -> Result<bool> {
        self.expect_step(WizardStep::StyleSelect, "choosing learning styles")?;
        toggle_tag(&mut self.selection.style_tags, tag)
    }

    pub fn can_confirm(&self) -> bool {
        self.selection.step == WizardStep::StyleSelect && !self.selection.style_tags.is_empty()
    }

    /// Step 3 → 4: requires at least one learning style.
    pub fn confirm_styles(&mut self) -> Result<QueryTicket> {
        self.expect_step(WizardStep::StyleSelect, "viewing recommendations")?;
        if self.selection.style_tags.is_empty() {
            return Err(AppError::transition("select at least one learning style"));
        }
        self.selection.step = WizardStep::Results;
        Ok(self.issue())
    }

    /// Move one step back, keeping every selection.
    pub fn back(&mut self) -> Result<()> {
        let previous = self
            .selection
            .step
            .previous()
            .ok_or_else(|| AppError::transition("already at the first step"))?;
        if self.selection.step == WizardStep::Results {
            self.sequence.invalidate();
        }
        self.selection.step = previous;
        Ok(())
    }

    /// Clear every selection and return to step 1.
    pub fn reset(&mut self) {
        self.selection = WizardSelection::default();
        self.results.clear();
        self.sequence.invalidate();
    }

    /// Jump straight to results from navigation parameters.
    ///
    /// Returns `Ok(None)` when the link lacks an exam type or subject, which
    /// leaves the finder at step 1. Tags are optional here.
    pub fn hydrate(&mut self, link: &DeepLink) -> Result<Option<QueryTicket>> {
        let (Some(label), Some(subject)) = (&link.exam_type, &link.subject) else {
            return Ok(None);
        };
        let exam = ExamType::from_label(label)
            .ok_or_else(|| AppError::validation(format!("unknown exam type '{label}'")))?;
        if self.strict_deep_links && !exam.offers_subject(subject) {
            return Err(AppError::validation(format!(
                "'{subject}' is not a {} subject",
                exam.label()
            )));
        }

        let mut style_tags = Vec::new();
        for tag in &link.tags {
            if !tag.trim().is_empty() && !style_tags.contains(tag) {
                style_tags.push(tag.clone());
            }
        }
        self.selection = WizardSelection {
            exam_type: Some(exam),
            subject: Some(subject.clone()),
            style_tags,
            step: WizardStep::Results,
        };
        self.results.clear();
        Ok(Some(self.issue()))
    }

    fn issue(&mut self) -> QueryTicket {
        QueryTicket {
            ticket: self.sequence.issue(),
            query: self.selection.recommendation_query(),
        }
    }

    /// Deliver a recommendation response. Stale tickets are dropped.
    pub fn apply(&mut self, ticket: Ticket, results: Vec<Instructor>) -> bool {
        if self.selection.step != WizardStep::Results || !self.sequence.is_current(ticket) {
            log::debug!("Discarding stale recommendation response #{}", ticket.seq());
            return false;
        }
        self.results = results;
        true
    }

    /// Deep link reproducing the current selections.
    pub fn share_link(&self) -> DeepLink {
        DeepLink {
            exam_type: self.selection.exam_type.map(|e| e.label().to_string()),
            subject: self.selection.subject.clone(),
            tags: self.selection.style_tags.clone(),
        }
    }
}
