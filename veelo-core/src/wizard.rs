//! Forward-only booking wizard: step sequencing, per-step validation, and the
//! selection-keyed caches feeding each step.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::calendar;
use crate::model::{
    Answers, BookingConfirmation, BookingRequest, ModelId, ReservedInterval, VehicleModel,
    VehicleType, VehicleTypeId, WheelCount,
};

/// Message shown when a step is advanced without answering its question.
pub const UNANSWERED_MESSAGE: &str = "Please answer the question before proceeding.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One numbered screen of the wizard.
pub enum Step {
    /// Renter first and last name.
    Identity,
    /// Two or four wheels.
    Wheels,
    /// Vehicle category, filtered by wheel count.
    VehicleType,
    /// Concrete model, filtered by category.
    Model,
    /// Rental date range.
    Dates,
}

impl Step {
    /// Total number of steps.
    pub const COUNT: u8 = 5;

    fn next(self) -> Option<Self> {
        match self {
            Step::Identity => Some(Step::Wheels),
            Step::Wheels => Some(Step::VehicleType),
            Step::VehicleType => Some(Step::Model),
            Step::Model => Some(Step::Dates),
            Step::Dates => None,
        }
    }

    /// 1-based position for progress display.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Step::Identity => 1,
            Step::Wheels => 2,
            Step::VehicleType => 3,
            Step::Model => 4,
            Step::Dates => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the wizard currently is.
pub enum WizardState {
    /// Collecting answers on the given step.
    Collecting(Step),
    /// Booking request is in flight.
    Submitting,
    /// Booking accepted.
    Done(BookingConfirmation),
    /// Booking failed with a user-visible message; `advance` retries.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of an [`Wizard::advance`] attempt.
pub enum Advance {
    /// Validation failed; step, answers, and caches are unchanged.
    Invalid(String),
    /// Moved forward to the given step.
    Entered(Step),
    /// All answers collected; the caller should submit this request and report
    /// back through [`Wizard::resolve_submission`].
    Submit(BookingRequest),
    /// Nothing to do (a submission is in flight, or the wizard is done).
    Noop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Remote data the wizard needs before its current step can offer options.
pub enum FetchNeed {
    /// The vehicle category catalog.
    VehicleTypes,
    /// Models of the given category.
    Models(VehicleTypeId),
    /// Existing bookings of the given model.
    ReservedIntervals(ModelId),
}

/// The booking wizard.
///
/// Owns the answer set and the selection-keyed caches; all remote I/O happens
/// outside and is fed back in through the `apply_*` methods, which discard
/// responses whose originating selection has since changed.
pub struct Wizard {
    state: WizardState,
    answers: Answers,
    today: NaiveDate,
    vehicle_types: Option<Vec<VehicleType>>,
    models: HashMap<VehicleTypeId, Vec<VehicleModel>>,
    reserved: Option<(ModelId, Vec<ReservedInterval>)>,
}

impl Wizard {
    /// Start a fresh wizard on the identity step.
    ///
    /// `today` anchors the no-past-dates rule of the date step.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: WizardState::Collecting(Step::Identity),
            answers: Answers::default(),
            today,
            vehicle_types: None,
            models: HashMap::new(),
            reserved: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Answers collected so far.
    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    /// Date used as "today" by the date gate.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    // ---- field updates (never change the step) ----

    /// Update the renter first name.
    pub fn set_first_name<S: Into<String>>(&mut self, value: S) {
        self.answers.first_name = value.into();
    }

    /// Update the renter last name.
    pub fn set_last_name<S: Into<String>>(&mut self, value: S) {
        self.answers.last_name = value.into();
    }

    /// Choose a wheel count. Changing it resets the dependent category and
    /// model answers; re-selecting the current value is a no-op.
    pub fn set_wheel_count(&mut self, wheels: WheelCount) {
        if self.answers.wheel_count == Some(wheels) {
            return;
        }
        self.answers.wheel_count = Some(wheels);
        self.answers.vehicle_type = None;
        self.answers.model = None;
        self.reserved = None;
    }

    /// Choose a vehicle category. Changing it resets the model answer.
    pub fn set_vehicle_type(&mut self, id: VehicleTypeId) {
        if self.answers.vehicle_type.as_ref() == Some(&id) {
            return;
        }
        self.answers.vehicle_type = Some(id);
        self.answers.model = None;
        self.reserved = None;
    }

    /// Choose a model. Changing it drops the cached reserved intervals so the
    /// date step refetches availability for the new model.
    pub fn set_model(&mut self, id: ModelId) {
        if self.answers.model.as_ref() == Some(&id) {
            return;
        }
        self.answers.model = Some(id);
        self.reserved = None;
    }

    /// Update the rental start day (`None` while the input is unparsed).
    pub fn set_start(&mut self, date: Option<NaiveDate>) {
        self.answers.start = date;
    }

    /// Update the rental end day (`None` while the input is unparsed).
    pub fn set_end(&mut self, date: Option<NaiveDate>) {
        self.answers.end = date;
    }

    // ---- stepping ----

    /// Validate the current step and move forward.
    ///
    /// From the last step (and as a retry from [`WizardState::Failed`]) this
    /// returns [`Advance::Submit`]; the wizard is then `Submitting` until
    /// [`Wizard::resolve_submission`] is called.
    pub fn advance(&mut self) -> Advance {
        let step = match &self.state {
            WizardState::Collecting(step) => *step,
            WizardState::Failed(_) => return self.begin_submission(),
            WizardState::Submitting | WizardState::Done(_) => return Advance::Noop,
        };

        if let Err(message) = self.validate(step) {
            return Advance::Invalid(message);
        }

        match step.next() {
            Some(next) => {
                self.state = WizardState::Collecting(next);
                Advance::Entered(next)
            }
            None => self.begin_submission(),
        }
    }

    fn validate(&self, step: Step) -> Result<(), String> {
        let answered = match step {
            Step::Identity => {
                !self.answers.first_name.trim().is_empty()
                    && !self.answers.last_name.trim().is_empty()
            }
            Step::Wheels => self.answers.wheel_count.is_some(),
            Step::VehicleType => self.answers.vehicle_type.is_some(),
            Step::Model => self.answers.model.is_some(),
            Step::Dates => self.answers.start.is_some() && self.answers.end.is_some(),
        };
        if !answered {
            return Err(UNANSWERED_MESSAGE.to_owned());
        }

        // The calendar UI only disables days advisorily; this is the
        // authoritative gate on the proposed range.
        if step == Step::Dates
            && let (Some(start), Some(end)) = (self.answers.start, self.answers.end)
            && let Some(conflict) =
                calendar::range_conflict(start, end, &self.disabled_days(), self.today)
        {
            return Err(conflict.to_string());
        }

        Ok(())
    }

    fn begin_submission(&mut self) -> Advance {
        match self.booking_request() {
            Some(request) => {
                self.state = WizardState::Submitting;
                Advance::Submit(request)
            }
            None => Advance::Invalid(UNANSWERED_MESSAGE.to_owned()),
        }
    }

    /// Assemble the submission payload, if every answer is present.
    #[must_use]
    pub fn booking_request(&self) -> Option<BookingRequest> {
        Some(BookingRequest {
            first_name: self.answers.first_name.trim().to_owned(),
            last_name: self.answers.last_name.trim().to_owned(),
            wheel_count: self.answers.wheel_count?,
            vehicle_type: self.answers.vehicle_type.clone()?,
            model: self.answers.model.clone()?,
            start: self.answers.start?,
            end: self.answers.end?,
        })
    }

    /// Report the outcome of a submission started via [`Advance::Submit`].
    ///
    /// On failure the answers are kept so a retry re-submits without forcing
    /// re-entry of earlier steps. Ignored unless a submission is in flight.
    pub fn resolve_submission(&mut self, result: Result<BookingConfirmation, String>) {
        if self.state != WizardState::Submitting {
            return;
        }
        self.state = match result {
            Ok(confirmation) => WizardState::Done(confirmation),
            Err(message) => WizardState::Failed(message),
        };
    }

    // ---- remote data plumbing ----

    /// Remote data required before the current step can offer its options.
    ///
    /// Keyed by the current selection: repeat entry into a step without a
    /// selection change needs no fetch, and a fetch that resolved empty is
    /// cached as empty rather than retried.
    #[must_use]
    pub fn pending_fetch(&self) -> Option<FetchNeed> {
        let WizardState::Collecting(step) = &self.state else {
            return None;
        };
        match step {
            Step::Identity | Step::Wheels => None,
            Step::VehicleType => self
                .vehicle_types
                .is_none()
                .then_some(FetchNeed::VehicleTypes),
            Step::Model => {
                let type_id = self.answers.vehicle_type.as_ref()?;
                (!self.models.contains_key(type_id))
                    .then(|| FetchNeed::Models(type_id.clone()))
            }
            Step::Dates => {
                let model = self.answers.model.as_ref()?;
                match &self.reserved {
                    Some((cached, _)) if cached == model => None,
                    _ => Some(FetchNeed::ReservedIntervals(model.clone())),
                }
            }
        }
    }

    /// Store the fetched vehicle category catalog.
    pub fn apply_vehicle_types(&mut self, types: Vec<VehicleType>) {
        self.vehicle_types = Some(types);
    }

    /// Store a fetched model list, unless the category selection has moved on
    /// since the fetch started.
    pub fn apply_models(&mut self, type_id: &VehicleTypeId, models: Vec<VehicleModel>) {
        if self.answers.vehicle_type.as_ref() != Some(type_id) {
            tracing::warn!(type_id = %type_id.0, "discarding stale model list");
            return;
        }
        self.models.insert(type_id.clone(), models);
    }

    /// Store fetched reserved intervals, unless the model selection has moved
    /// on since the fetch started.
    pub fn apply_reserved_intervals(
        &mut self,
        model: &ModelId,
        intervals: Vec<ReservedInterval>,
    ) {
        if self.answers.model.as_ref() != Some(model) {
            tracing::warn!(model = %model.0, "discarding stale availability response");
            return;
        }
        self.reserved = Some((model.clone(), intervals));
    }

    // ---- stateless queries over the caches ----

    /// Vehicle categories matching the answered wheel count, in catalog order.
    #[must_use]
    pub fn vehicle_type_options(&self) -> Vec<&VehicleType> {
        let Some(wheels) = self.answers.wheel_count else {
            return Vec::new();
        };
        self.vehicle_types
            .iter()
            .flatten()
            .filter(|ty| ty.wheel_count == wheels)
            .collect()
    }

    /// Models belonging to the answered vehicle category.
    #[must_use]
    pub fn model_options(&self) -> Vec<&VehicleModel> {
        let Some(type_id) = self.answers.vehicle_type.as_ref() else {
            return Vec::new();
        };
        self.models
            .get(type_id)
            .into_iter()
            .flatten()
            .filter(|model| &model.type_id == type_id)
            .collect()
    }

    /// Days that cannot be selected for the current model, derived on demand
    /// from the cached reserved intervals.
    #[must_use]
    pub fn disabled_days(&self) -> BTreeSet<NaiveDate> {
        match &self.reserved {
            Some((_, intervals)) => calendar::disabled_days(intervals),
            None => BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, dom).unwrap()
    }

    fn today() -> NaiveDate {
        day(2026, 5, 1)
    }

    fn catalog() -> Vec<VehicleType> {
        vec![
            VehicleType {
                id: VehicleTypeId("sedan".into()),
                wheel_count: WheelCount::Four,
                label: "Sedan".into(),
            },
            VehicleType {
                id: VehicleTypeId("suv".into()),
                wheel_count: WheelCount::Four,
                label: "SUV".into(),
            },
            VehicleType {
                id: VehicleTypeId("cruiser".into()),
                wheel_count: WheelCount::Two,
                label: "Cruiser".into(),
            },
        ]
    }

    fn sedans() -> Vec<VehicleModel> {
        vec![VehicleModel {
            id: ModelId("civic-2020".into()),
            type_id: VehicleTypeId("sedan".into()),
            name: "Honda Civic 2020".into(),
            image_url: None,
        }]
    }

    /// Wizard advanced to the dates step with the happy-path answers filled.
    fn wizard_at_dates() -> Wizard {
        let mut wizard = Wizard::new(today());
        wizard.set_first_name("Ana");
        wizard.set_last_name("Lee");
        assert_eq!(wizard.advance(), Advance::Entered(Step::Wheels));
        wizard.set_wheel_count(WheelCount::Four);
        assert_eq!(wizard.advance(), Advance::Entered(Step::VehicleType));
        wizard.apply_vehicle_types(catalog());
        wizard.set_vehicle_type(VehicleTypeId("sedan".into()));
        assert_eq!(wizard.advance(), Advance::Entered(Step::Model));
        wizard.apply_models(&VehicleTypeId("sedan".into()), sedans());
        wizard.set_model(ModelId("civic-2020".into()));
        assert_eq!(wizard.advance(), Advance::Entered(Step::Dates));
        wizard
    }

    #[test]
    fn starts_on_identity() {
        let wizard = Wizard::new(today());
        assert_eq!(wizard.state(), &WizardState::Collecting(Step::Identity));
    }

    #[test]
    fn unanswered_steps_do_not_advance() {
        let mut wizard = Wizard::new(today());

        // Identity: blank and whitespace-only names are both rejected.
        assert_eq!(
            wizard.advance(),
            Advance::Invalid(UNANSWERED_MESSAGE.to_owned())
        );
        wizard.set_first_name("  ");
        wizard.set_last_name("Lee");
        assert_eq!(
            wizard.advance(),
            Advance::Invalid(UNANSWERED_MESSAGE.to_owned())
        );
        assert_eq!(wizard.state(), &WizardState::Collecting(Step::Identity));

        wizard.set_first_name("Ana");
        assert_eq!(wizard.advance(), Advance::Entered(Step::Wheels));

        // Wheels, type, model, dates: each blocks until answered.
        let before = wizard.answers().clone();
        assert_eq!(
            wizard.advance(),
            Advance::Invalid(UNANSWERED_MESSAGE.to_owned())
        );
        assert_eq!(wizard.answers(), &before);
        assert_eq!(wizard.state(), &WizardState::Collecting(Step::Wheels));
    }

    #[test]
    fn changing_wheel_count_resets_type_and_model() {
        let mut wizard = Wizard::new(today());
        wizard.set_wheel_count(WheelCount::Four);
        wizard.set_vehicle_type(VehicleTypeId("sedan".into()));
        wizard.set_model(ModelId("civic-2020".into()));

        wizard.set_wheel_count(WheelCount::Two);
        assert_eq!(wizard.answers().vehicle_type, None);
        assert_eq!(wizard.answers().model, None);
    }

    #[test]
    fn changing_vehicle_type_resets_model() {
        let mut wizard = Wizard::new(today());
        wizard.set_wheel_count(WheelCount::Four);
        wizard.set_vehicle_type(VehicleTypeId("sedan".into()));
        wizard.set_model(ModelId("civic-2020".into()));

        wizard.set_vehicle_type(VehicleTypeId("suv".into()));
        assert_eq!(wizard.answers().model, None);
    }

    #[test]
    fn reselecting_the_same_value_keeps_dependents() {
        let mut wizard = Wizard::new(today());
        wizard.set_wheel_count(WheelCount::Four);
        wizard.set_vehicle_type(VehicleTypeId("sedan".into()));
        wizard.set_model(ModelId("civic-2020".into()));
        wizard.apply_reserved_intervals(
            &ModelId("civic-2020".into()),
            vec![ReservedInterval {
                start: day(2026, 6, 1),
                end: day(2026, 6, 3),
            }],
        );

        wizard.set_wheel_count(WheelCount::Four);
        wizard.set_vehicle_type(VehicleTypeId("sedan".into()));
        wizard.set_model(ModelId("civic-2020".into()));

        assert_eq!(
            wizard.answers().vehicle_type,
            Some(VehicleTypeId("sedan".into()))
        );
        assert_eq!(wizard.answers().model, Some(ModelId("civic-2020".into())));
        // The availability cache survived, so nothing needs refetching.
        assert_eq!(wizard.disabled_days().len(), 3);
    }

    #[test]
    fn changing_model_invalidates_availability() {
        let mut wizard = wizard_at_dates();
        wizard.apply_reserved_intervals(
            &ModelId("civic-2020".into()),
            vec![ReservedInterval {
                start: day(2026, 6, 1),
                end: day(2026, 6, 3),
            }],
        );
        assert_eq!(wizard.disabled_days().len(), 3);

        wizard.set_model(ModelId("rav4-2021".into()));
        assert!(wizard.disabled_days().is_empty());
        assert_eq!(
            wizard.pending_fetch(),
            Some(FetchNeed::ReservedIntervals(ModelId("rav4-2021".into())))
        );
    }

    #[test]
    fn stale_availability_response_is_discarded() {
        let mut wizard = wizard_at_dates();
        wizard.set_model(ModelId("rav4-2021".into()));

        // The civic fetch resolves after the user already switched models.
        wizard.apply_reserved_intervals(
            &ModelId("civic-2020".into()),
            vec![ReservedInterval {
                start: day(2026, 6, 1),
                end: day(2026, 6, 3),
            }],
        );
        assert!(wizard.disabled_days().is_empty());
        assert_eq!(
            wizard.pending_fetch(),
            Some(FetchNeed::ReservedIntervals(ModelId("rav4-2021".into())))
        );
    }

    #[test]
    fn stale_model_list_is_discarded() {
        let mut wizard = Wizard::new(today());
        wizard.set_wheel_count(WheelCount::Four);
        wizard.set_vehicle_type(VehicleTypeId("suv".into()));
        wizard.apply_models(&VehicleTypeId("sedan".into()), sedans());
        assert!(wizard.model_options().is_empty());
    }

    #[test]
    fn option_lists_filter_by_exact_selection() {
        let mut wizard = Wizard::new(today());
        wizard.apply_vehicle_types(catalog());

        wizard.set_wheel_count(WheelCount::Four);
        let labels: Vec<_> = wizard
            .vehicle_type_options()
            .iter()
            .map(|ty| ty.label.as_str())
            .collect();
        assert_eq!(labels, ["Sedan", "SUV"]);

        wizard.set_wheel_count(WheelCount::Two);
        let labels: Vec<_> = wizard
            .vehicle_type_options()
            .iter()
            .map(|ty| ty.label.as_str())
            .collect();
        assert_eq!(labels, ["Cruiser"]);
    }

    #[test]
    fn pending_fetch_is_keyed_by_selection() {
        let mut wizard = Wizard::new(today());
        wizard.set_first_name("Ana");
        wizard.set_last_name("Lee");
        wizard.advance();
        wizard.set_wheel_count(WheelCount::Four);
        wizard.advance();

        assert_eq!(wizard.pending_fetch(), Some(FetchNeed::VehicleTypes));
        // A fetch that degraded to empty is still a resolved fetch.
        wizard.apply_vehicle_types(Vec::new());
        assert_eq!(wizard.pending_fetch(), None);
    }

    #[test]
    fn empty_catalog_degrades_to_validation_failure() {
        let mut wizard = Wizard::new(today());
        wizard.set_first_name("Ana");
        wizard.set_last_name("Lee");
        wizard.advance();
        wizard.set_wheel_count(WheelCount::Four);
        wizard.advance();
        wizard.apply_vehicle_types(Vec::new());

        assert!(wizard.vehicle_type_options().is_empty());
        assert_eq!(
            wizard.advance(),
            Advance::Invalid(UNANSWERED_MESSAGE.to_owned())
        );
    }

    #[test]
    fn date_gate_rejects_overlap_and_past() {
        let mut wizard = wizard_at_dates();
        wizard.apply_reserved_intervals(
            &ModelId("civic-2020".into()),
            vec![ReservedInterval {
                start: day(2026, 6, 2),
                end: day(2026, 6, 2),
            }],
        );

        wizard.set_start(Some(day(2026, 6, 1)));
        wizard.set_end(Some(day(2026, 6, 3)));
        assert_eq!(
            wizard.advance(),
            Advance::Invalid("2026-06-02 is already booked".to_owned())
        );
        assert_eq!(wizard.state(), &WizardState::Collecting(Step::Dates));

        wizard.set_start(Some(day(2026, 4, 30)));
        wizard.set_end(Some(day(2026, 5, 2)));
        assert_eq!(
            wizard.advance(),
            Advance::Invalid("Start date is in the past".to_owned())
        );

        wizard.set_start(Some(day(2026, 6, 3)));
        wizard.set_end(Some(day(2026, 6, 5)));
        assert!(matches!(wizard.advance(), Advance::Submit(_)));
    }

    #[test]
    fn happy_path_submits_all_fields_and_finishes() {
        let mut wizard = wizard_at_dates();
        wizard.apply_reserved_intervals(&ModelId("civic-2020".into()), Vec::new());
        wizard.set_start(Some(day(2026, 6, 1)));
        wizard.set_end(Some(day(2026, 6, 3)));

        let Advance::Submit(request) = wizard.advance() else {
            panic!("expected submission");
        };
        assert_eq!(request.first_name, "Ana");
        assert_eq!(request.last_name, "Lee");
        assert_eq!(request.wheel_count, WheelCount::Four);
        assert_eq!(request.vehicle_type, VehicleTypeId("sedan".into()));
        assert_eq!(request.model, ModelId("civic-2020".into()));
        assert_eq!(request.start, day(2026, 6, 1));
        assert_eq!(request.end, day(2026, 6, 3));
        assert_eq!(wizard.state(), &WizardState::Submitting);

        // Double-pressing submit while in flight does nothing.
        assert_eq!(wizard.advance(), Advance::Noop);

        wizard.resolve_submission(Ok(BookingConfirmation {
            booking_id: Some("bk-1".into()),
        }));
        assert_eq!(
            wizard.state(),
            &WizardState::Done(BookingConfirmation {
                booking_id: Some("bk-1".into()),
            })
        );
        assert_eq!(wizard.advance(), Advance::Noop);
    }

    #[test]
    fn failed_submission_keeps_answers_and_retries() {
        let mut wizard = wizard_at_dates();
        wizard.apply_reserved_intervals(&ModelId("civic-2020".into()), Vec::new());
        wizard.set_start(Some(day(2026, 6, 1)));
        wizard.set_end(Some(day(2026, 6, 3)));

        assert!(matches!(wizard.advance(), Advance::Submit(_)));
        wizard.resolve_submission(Err("Vehicle no longer available".to_owned()));
        assert_eq!(
            wizard.state(),
            &WizardState::Failed("Vehicle no longer available".to_owned())
        );
        assert_eq!(wizard.answers().first_name, "Ana");

        // Retry re-submits the same request without re-entering steps.
        let Advance::Submit(retry) = wizard.advance() else {
            panic!("expected retry submission");
        };
        assert_eq!(retry.model, ModelId("civic-2020".into()));
        assert_eq!(wizard.state(), &WizardState::Submitting);
    }

    #[test]
    fn resolve_without_inflight_submission_is_ignored() {
        let mut wizard = Wizard::new(today());
        wizard.resolve_submission(Err("boom".to_owned()));
        assert_eq!(wizard.state(), &WizardState::Collecting(Step::Identity));
    }
}
