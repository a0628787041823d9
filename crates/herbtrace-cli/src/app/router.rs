//! Screen router.
//!
//! [`AppState`] is the whole navigation state: the current [`Screen`], its
//! payload and the logged-in user. It only changes through
//! [`AppState::update`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use herbtrace_core::{HerbBatch, Location, UserProfile, UserType};

/// Every view the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Screen {
    Dashboard,
    About,
    Features,
    Contact,
    QaResults,
    Stakeholders,
    Compliance,
    Login(UserType),
    FarmerDashboard,
    CustomerDashboard,
    AdminDashboard,
    FarmerForm,
    LocationPicker,
    QrGenerated,
    QrScanner,
    HerbDetails,
}

impl Screen {
    /// Where "back" leads from this screen, if anywhere.
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Login(_)
            | Self::About
            | Self::Features
            | Self::Contact
            | Self::FarmerDashboard
            | Self::CustomerDashboard
            | Self::AdminDashboard => Some(Self::Dashboard),
            Self::FarmerForm | Self::QrGenerated => Some(Self::FarmerDashboard),
            Self::QrScanner | Self::HerbDetails => Some(Self::CustomerDashboard),
            Self::LocationPicker => Some(Self::FarmerForm),
            Self::Dashboard | Self::QaResults | Self::Stakeholders | Self::Compliance => None,
        }
    }

    /// Role dashboard a user lands on after login.
    pub const fn dashboard_for(user_type: UserType) -> Self {
        match user_type {
            UserType::Farmer => Self::FarmerDashboard,
            UserType::Customer => Self::CustomerDashboard,
            UserType::Admin => Self::AdminDashboard,
        }
    }

    /// Public pages carry the site footer.
    pub const fn shows_footer(self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::About
                | Self::Features
                | Self::Contact
                | Self::QaResults
                | Self::Stakeholders
                | Self::Compliance
        )
    }

    pub const fn is_role_dashboard(self) -> bool {
        matches!(
            self,
            Self::FarmerDashboard | Self::CustomerDashboard | Self::AdminDashboard
        )
    }

    /// Stable string key, e.g. `"farmer-form"`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::About => "about",
            Self::Features => "features",
            Self::Contact => "contact",
            Self::QaResults => "qa-results",
            Self::Stakeholders => "stakeholders",
            Self::Compliance => "compliance",
            Self::Login(UserType::Farmer) => "login-farmer",
            Self::Login(UserType::Customer) => "login-customer",
            Self::Login(UserType::Admin) => "login-admin",
            Self::FarmerDashboard => "farmer-dashboard",
            Self::CustomerDashboard => "customer-dashboard",
            Self::AdminDashboard => "admin-dashboard",
            Self::FarmerForm => "farmer-form",
            Self::LocationPicker => "location-picker",
            Self::QrGenerated => "qr-generated",
            Self::QrScanner => "qr-scanner",
            Self::HerbDetails => "herb-details",
        }
    }

    /// Human title for headers.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Ayurvedic Herb Traceability",
            Self::About => "About HerbTrace",
            Self::Features => "Features",
            Self::Contact => "Contact Us",
            Self::QaResults => "QA Results",
            Self::Stakeholders => "Stakeholders",
            Self::Compliance => "Compliance",
            Self::Login(UserType::Farmer) => "Farmer Login",
            Self::Login(UserType::Customer) => "Customer Login",
            Self::Login(UserType::Admin) => "Admin Login",
            Self::FarmerDashboard => "Farmer Dashboard",
            Self::CustomerDashboard => "Customer Portal",
            Self::AdminDashboard => "Admin Dashboard",
            Self::FarmerForm => "Add Herb Collection",
            Self::LocationPicker => "Pick Location",
            Self::QrGenerated => "Batch QR Code",
            Self::QrScanner => "Scan QR Code",
            Self::HerbDetails => "Herb Details",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let screen = match s {
            "dashboard" | "home" => Self::Dashboard,
            "about" => Self::About,
            "features" => Self::Features,
            "contact" => Self::Contact,
            "qa-results" => Self::QaResults,
            "stakeholders" => Self::Stakeholders,
            "compliance" => Self::Compliance,
            "login-farmer" => Self::Login(UserType::Farmer),
            "login-customer" => Self::Login(UserType::Customer),
            "login-admin" => Self::Login(UserType::Admin),
            "farmer-dashboard" => Self::FarmerDashboard,
            "customer-dashboard" => Self::CustomerDashboard,
            "admin-dashboard" => Self::AdminDashboard,
            "farmer-form" => Self::FarmerForm,
            "location-picker" => Self::LocationPicker,
            "qr-generated" => Self::QrGenerated,
            "qr-scanner" => Self::QrScanner,
            "herb-details" => Self::HerbDetails,
            other => return Err(format!("unknown screen: {other}")),
        };
        Ok(screen)
    }
}

impl TryFrom<String> for Screen {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Screen> for String {
    fn from(screen: Screen) -> Self {
        screen.key().to_string()
    }
}

/// Payload carried alongside the current screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScreenData {
    #[default]
    None,
    /// Freshly created batch shown on the QR screen.
    Batch { batch_id: String },
    /// Looked-up batch shown on the details screen.
    Herb(Box<HerbBatch>),
    /// Location chosen in the picker, handed back to the farmer form.
    Location(Location),
}

/// State transitions. Nothing else mutates [`AppState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Go to `screen` with `data`, unconditionally.
    Navigate(Screen, ScreenData),
    /// Go to the parent screen; no-op where there is none.
    Back,
    Login(UserProfile),
    Logout,
    /// Hand a picked location back to the farmer form.
    SelectLocation(Location),
}

/// Navigation state of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub screen: Screen,
    #[serde(default)]
    pub data: ScreenData,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Dashboard,
            data: ScreenData::None,
            user: None,
        }
    }
}

impl AppState {
    /// Apply one action.
    pub fn update(&mut self, action: Action) {
        match action {
            Action::Navigate(screen, data) => {
                self.screen = screen;
                self.data = data;
            }
            Action::Back => self.back(),
            Action::Login(user) => {
                self.screen = Screen::dashboard_for(user.user_type);
                self.user = Some(user);
            }
            Action::Logout => {
                self.user = None;
                self.screen = Screen::Dashboard;
            }
            Action::SelectLocation(location) => {
                self.data = ScreenData::Location(location);
                self.back();
            }
        }
    }

    /// Convenience for [`Action::Navigate`].
    pub fn navigate(&mut self, screen: Screen, data: ScreenData) {
        self.update(Action::Navigate(screen, data));
    }

    fn back(&mut self) {
        if let Some(parent) = self.screen.parent() {
            self.screen = parent;
        }
    }

    /// Location handed back by the picker, if the payload holds one.
    pub const fn picked_location(&self) -> Option<&Location> {
        match &self.data {
            ScreenData::Location(location) => Some(location),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use herbtrace_core::authenticate_user;

    use super::*;

    const ALL: [Screen; 18] = [
        Screen::Dashboard,
        Screen::About,
        Screen::Features,
        Screen::Contact,
        Screen::QaResults,
        Screen::Stakeholders,
        Screen::Compliance,
        Screen::Login(UserType::Farmer),
        Screen::Login(UserType::Customer),
        Screen::Login(UserType::Admin),
        Screen::FarmerDashboard,
        Screen::CustomerDashboard,
        Screen::AdminDashboard,
        Screen::FarmerForm,
        Screen::LocationPicker,
        Screen::QrGenerated,
        Screen::QrScanner,
        Screen::HerbDetails,
    ];

    fn at(screen: Screen) -> AppState {
        AppState {
            screen,
            ..AppState::default()
        }
    }

    #[test]
    fn back_from_farmer_form_goes_to_farmer_dashboard() {
        let mut state = at(Screen::FarmerForm);
        state.update(Action::Back);
        assert_eq!(state.screen, Screen::FarmerDashboard);
    }

    #[test]
    fn back_from_dashboard_is_noop() {
        let mut state = at(Screen::Dashboard);
        state.update(Action::Back);
        assert_eq!(state, at(Screen::Dashboard));
    }

    #[test]
    fn back_table_matches_parents() {
        let cases = [
            ("login-admin", Some("dashboard")),
            ("about", Some("dashboard")),
            ("qr-generated", Some("farmer-dashboard")),
            ("qr-scanner", Some("customer-dashboard")),
            ("herb-details", Some("customer-dashboard")),
            ("admin-dashboard", Some("dashboard")),
            ("location-picker", Some("farmer-form")),
            ("compliance", None),
            ("qa-results", None),
        ];
        for (from, to) in cases {
            let screen: Screen = from.parse().unwrap();
            assert_eq!(screen.parent().map(Screen::key), to, "{from}");
        }
    }

    #[test]
    fn back_keeps_payload() {
        let mut state = at(Screen::QrGenerated);
        state.data = ScreenData::Batch {
            batch_id: "HERB1".into(),
        };
        state.update(Action::Back);
        assert_eq!(state.screen, Screen::FarmerDashboard);
        assert!(matches!(state.data, ScreenData::Batch { .. }));
    }

    #[test]
    fn navigate_sets_screen_and_data_unconditionally() {
        let mut state = at(Screen::Dashboard);
        state.navigate(
            Screen::QrGenerated,
            ScreenData::Batch {
                batch_id: "HERB1".into(),
            },
        );
        assert_eq!(state.screen, Screen::QrGenerated);
        state.navigate(Screen::About, ScreenData::None);
        assert_eq!(state.data, ScreenData::None);
    }

    #[test]
    fn login_lands_on_role_dashboard() {
        for (ty, dashboard) in [
            (UserType::Farmer, Screen::FarmerDashboard),
            (UserType::Customer, Screen::CustomerDashboard),
            (UserType::Admin, Screen::AdminDashboard),
        ] {
            let mut state = at(Screen::Login(ty));
            let user = authenticate_user("jane.doe@x.com", "pw", ty).unwrap();
            state.update(Action::Login(user));
            assert_eq!(state.screen, dashboard);
            assert!(state.user.is_some());
        }
    }

    #[test]
    fn logout_clears_user() {
        let mut state = at(Screen::Login(UserType::Farmer));
        let user = authenticate_user("a@b.c", "pw", UserType::Farmer).unwrap();
        state.update(Action::Login(user));
        state.update(Action::Logout);
        assert_eq!(state.screen, Screen::Dashboard);
        assert!(state.user.is_none());
    }

    #[test]
    fn select_location_returns_to_form_with_payload() {
        let mut state = at(Screen::LocationPicker);
        let location = Location {
            latitude: 10.0,
            longitude: 76.0,
            address: None,
        };
        state.update(Action::SelectLocation(location.clone()));
        assert_eq!(state.screen, Screen::FarmerForm);
        assert_eq!(state.picked_location(), Some(&location));
    }

    #[test]
    fn keys_round_trip() {
        for screen in ALL {
            assert_eq!(screen.key().parse::<Screen>().unwrap(), screen);
        }
        assert_eq!("home".parse::<Screen>().unwrap(), Screen::Dashboard);
        assert!("settings".parse::<Screen>().is_err());
    }

    #[test]
    fn every_parent_chain_reaches_a_root() {
        for screen in ALL {
            let mut current = screen;
            let mut hops = 0;
            while let Some(parent) = current.parent() {
                current = parent;
                hops += 1;
                assert!(hops < ALL.len(), "cycle from {screen}");
            }
        }
    }

    #[test]
    fn state_serializes_with_screen_keys() {
        let mut state = at(Screen::FarmerForm);
        state.data = ScreenData::Location(Location {
            latitude: 1.0,
            longitude: 2.0,
            address: None,
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["screen"], "farmer-form");
        assert_eq!(json["data"]["kind"], "location");

        let back: AppState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
