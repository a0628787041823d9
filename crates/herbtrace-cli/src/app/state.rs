//! Application state and types.

use tracing::{error, info, warn};

use herbtrace_core::{HerbForm, HerbRecord, Location, UserType};

use super::router::{Action, AppState, Screen, ScreenData};
use crate::worker::{Command, Outcome};

/// Single-line text input with a byte cursor kept on char boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
        }
    }

    pub fn right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map_or(self.value.len(), |(i, _)| self.cursor + i);
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

/// Which login field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginFocus {
    #[default]
    Email,
    Password,
}

/// Login screen inputs.
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub email: InputField,
    pub password: InputField,
    pub focus: LoginFocus,
}

impl LoginInput {
    pub const fn focused_mut(&mut self) -> &mut InputField {
        match self.focus {
            LoginFocus::Email => &mut self.email,
            LoginFocus::Password => &mut self.password,
        }
    }

    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Email,
        };
    }
}

/// Rows of the farmer form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    HerbName,
    Quantity,
    Location,
    Photo,
    QualityGrade,
    Processing,
    Testing,
    Organic,
    Submit,
}

impl FormField {
    pub const ORDER: [Self; 9] = [
        Self::HerbName,
        Self::Quantity,
        Self::Location,
        Self::Photo,
        Self::QualityGrade,
        Self::Processing,
        Self::Testing,
        Self::Organic,
        Self::Submit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::HerbName => "Herb name",
            Self::Quantity => "Quantity (kg)",
            Self::Location => "Location",
            Self::Photo => "Photo URL",
            Self::QualityGrade => "Quality grade",
            Self::Processing => "Processing (; separated)",
            Self::Testing => "Testing (; separated)",
            Self::Organic => "Organic certified",
            Self::Submit => "Submit",
        }
    }

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// Farmer form inputs. The location itself travels as the screen payload.
#[derive(Debug, Clone, Default)]
pub struct FarmerFormInput {
    pub herb_name: InputField,
    pub quantity: InputField,
    pub photo: InputField,
    pub quality_grade: InputField,
    pub processing: InputField,
    pub testing: InputField,
    pub organic: bool,
    pub focus: FormField,
}

impl FarmerFormInput {
    /// Text input behind `field`, if it is a text row.
    pub const fn text_mut(&mut self, field: FormField) -> Option<&mut InputField> {
        match field {
            FormField::HerbName => Some(&mut self.herb_name),
            FormField::Quantity => Some(&mut self.quantity),
            FormField::Photo => Some(&mut self.photo),
            FormField::QualityGrade => Some(&mut self.quality_grade),
            FormField::Processing => Some(&mut self.processing),
            FormField::Testing => Some(&mut self.testing),
            FormField::Location | FormField::Organic | FormField::Submit => None,
        }
    }

    pub const fn text(&self, field: FormField) -> Option<&InputField> {
        match field {
            FormField::HerbName => Some(&self.herb_name),
            FormField::Quantity => Some(&self.quantity),
            FormField::Photo => Some(&self.photo),
            FormField::QualityGrade => Some(&self.quality_grade),
            FormField::Processing => Some(&self.processing),
            FormField::Testing => Some(&self.testing),
            FormField::Location | FormField::Organic | FormField::Submit => None,
        }
    }

    /// Build the submission from the inputs and the picked location.
    pub fn to_form(&self, location: Option<Location>) -> HerbForm {
        let text = |f: &InputField| Some(f.value.clone());
        HerbForm {
            herb_name: text(&self.herb_name),
            quantity: text(&self.quantity),
            location,
            photo: text(&self.photo),
            processing: split_entries(&self.processing.value),
            testing: split_entries(&self.testing.value),
            organic_certified: self.organic,
            quality_grade: text(&self.quality_grade),
        }
    }
}

fn split_entries(value: &str) -> Vec<serde_json::Value> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| serde_json::Value::String(s.to_string()))
        .collect()
}

/// Rows of the location picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationFocus {
    #[default]
    Latitude,
    Longitude,
    Address,
}

/// Location picker inputs.
#[derive(Debug, Clone, Default)]
pub struct LocationInput {
    pub latitude: InputField,
    pub longitude: InputField,
    pub address: InputField,
    pub focus: LocationFocus,
}

impl LocationInput {
    pub const fn focused_mut(&mut self) -> &mut InputField {
        match self.focus {
            LocationFocus::Latitude => &mut self.latitude,
            LocationFocus::Longitude => &mut self.longitude,
            LocationFocus::Address => &mut self.address,
        }
    }

    pub const fn next_focus(&mut self) {
        self.focus = match self.focus {
            LocationFocus::Latitude => LocationFocus::Longitude,
            LocationFocus::Longitude => LocationFocus::Address,
            LocationFocus::Address => LocationFocus::Latitude,
        };
    }

    pub const fn prev_focus(&mut self) {
        self.focus = match self.focus {
            LocationFocus::Latitude => LocationFocus::Address,
            LocationFocus::Longitude => LocationFocus::Latitude,
            LocationFocus::Address => LocationFocus::Longitude,
        };
    }

    pub fn parse(&self) -> Result<Location, String> {
        Location::parse(
            &self.latitude.value,
            &self.longitude.value,
            &self.address.value,
        )
    }

    fn prefill(location: &Location) -> Self {
        Self {
            latitude: InputField::with_value(&location.latitude.to_string()),
            longitude: InputField::with_value(&location.longitude.to_string()),
            address: InputField::with_value(location.address.as_deref().unwrap_or_default()),
            focus: LocationFocus::Latitude,
        }
    }
}

/// TUI application state.
pub struct App {
    pub state: AppState,
    pub login: LoginInput,
    pub farmer_form: FarmerFormInput,
    pub location: LocationInput,
    pub scanner: InputField,
    /// Farmer dashboard listing.
    pub collections: Vec<HerbRecord>,
    /// Admin dashboard listing.
    pub batches: Vec<HerbRecord>,
    /// Highlighted row in the active listing.
    pub selected: usize,
    /// A command is in flight.
    pub busy: bool,
    pub status: String,
    pub should_quit: bool,
    /// Set by the error boundary; replaces the whole interface when present.
    pub crash: Option<String>,
    pub store_label: String,
}

impl App {
    pub fn new(store_label: &str) -> Self {
        Self {
            state: AppState::default(),
            login: LoginInput::default(),
            farmer_form: FarmerFormInput::default(),
            location: LocationInput::default(),
            scanner: InputField::default(),
            collections: Vec::new(),
            batches: Vec::new(),
            selected: 0,
            busy: false,
            status: format!("Store: {store_label}"),
            should_quit: false,
            crash: None,
            store_label: store_label.to_string(),
        }
    }

    pub const fn screen(&self) -> Screen {
        self.state.screen
    }

    /// Apply an action and return the command the new screen needs, if any.
    pub fn dispatch(&mut self, action: Action) -> Option<Command> {
        let previous = self.state.screen;
        if matches!(action, Action::Login(_) | Action::Logout) {
            self.collections.clear();
            self.batches.clear();
        }
        self.state.update(action);
        if self.state.screen == previous {
            None
        } else {
            self.on_enter(previous)
        }
    }

    fn on_enter(&mut self, previous: Screen) -> Option<Command> {
        self.selected = 0;
        match self.state.screen {
            Screen::Login(_) => {
                self.login = LoginInput::default();
                None
            }
            Screen::FarmerForm if previous != Screen::LocationPicker => {
                self.farmer_form = FarmerFormInput::default();
                None
            }
            Screen::LocationPicker => {
                self.location = self
                    .state
                    .picked_location()
                    .map(LocationInput::prefill)
                    .unwrap_or_default();
                None
            }
            Screen::QrScanner => {
                self.scanner.clear();
                None
            }
            Screen::FarmerDashboard => {
                let farmer_id = self.state.user.as_ref()?.user_id.clone();
                self.busy = true;
                Some(Command::LoadCollections(farmer_id))
            }
            Screen::AdminDashboard => {
                self.busy = true;
                Some(Command::LoadAllBatches)
            }
            _ => None,
        }
    }

    /// Log in through the stub, or explain why not.
    pub fn attempt_login(&mut self, user_type: UserType) -> Option<Command> {
        match herbtrace_core::authenticate_user(
            self.login.email.trimmed(),
            &self.login.password.value,
            user_type,
        ) {
            Some(user) => {
                info!(user_id = %user.user_id, "Logged in");
                self.status = format!("Welcome, {}", user.full_name);
                self.dispatch(Action::Login(user))
            }
            None => {
                self.status = "Please enter both email and password".to_string();
                None
            }
        }
    }

    /// Build the submit command from the farmer form.
    pub fn submit_farmer_form(&mut self) -> Command {
        let form = self
            .farmer_form
            .to_form(self.state.picked_location().cloned());
        let (farmer_id, farmer_name) = self
            .state
            .user
            .as_ref()
            .map(|u| (u.user_id.clone(), u.full_name.clone()))
            .unwrap_or_default();
        self.busy = true;
        self.status = "Saving herb collection...".to_string();
        Command::SubmitHerb {
            form,
            farmer_id,
            farmer_name,
        }
    }

    /// Rows of the listing shown on the current screen.
    pub fn listing(&self) -> &[HerbRecord] {
        match self.state.screen {
            Screen::FarmerDashboard => &self.collections,
            Screen::AdminDashboard => &self.batches,
            _ => &[],
        }
    }

    pub fn select_next(&mut self) {
        let len = self.listing().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub const fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Fold a worker result into the state.
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        self.busy = false;
        match outcome {
            Outcome::Submitted(Ok(batch_id)) => {
                self.status = format!("Batch {batch_id} recorded");
                self.farmer_form = FarmerFormInput::default();
                self.dispatch(Action::Navigate(
                    Screen::QrGenerated,
                    ScreenData::Batch { batch_id },
                ));
            }
            Outcome::Submitted(Err(e)) => {
                self.status = e.to_string();
            }
            Outcome::LookedUp {
                batch_id,
                result: Ok(Some(herb)),
            } => {
                self.status = format!("Verified batch {batch_id}");
                self.dispatch(Action::Navigate(
                    Screen::HerbDetails,
                    ScreenData::Herb(Box::new(herb)),
                ));
            }
            Outcome::LookedUp {
                batch_id,
                result: Ok(None),
            } => {
                self.status = format!("No herb batch found for {batch_id}");
            }
            Outcome::LookedUp {
                batch_id,
                result: Err(e),
            } => {
                warn!(batch_id = %batch_id, error = %e, "Batch lookup failed");
                self.status = e.to_string();
            }
            Outcome::Batches(Err(e)) => {
                self.crash(&e);
            }
            Outcome::Collections(records) => {
                self.status = format!("{} collection(s)", records.len());
                self.collections = records;
            }
            Outcome::Batches(Ok(records)) => {
                self.status = format!("{} batch(es)", records.len());
                self.batches = records;
            }
        }
        let len = self.listing().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Error boundary: replace the interface with the reload prompt.
    pub fn crash(&mut self, err: &dyn std::fmt::Display) {
        error!(error = %err, "Unhandled application error");
        self.crash = Some(err.to_string());
    }

    /// Start over from a fresh state, as a page reload would.
    pub fn reload(&mut self) {
        info!("Reloading application state");
        *self = Self::new(&self.store_label);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new("in-memory")
    }
}
