//! Tests for TUI key handling.

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc;

    use herbtrace_core::{HerbBatch, UserType, authenticate_user};

    use crate::app::{Action, App, FormField, Screen, ScreenData};
    use crate::tui::{handle_key, key_to_command};
    use crate::worker::{Command, Outcome};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Command> {
        key_to_command(app, key(code))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert!(press(app, KeyCode::Char(c)).is_none());
        }
    }

    fn logged_in(user_type: UserType) -> App {
        let mut app = App::default();
        let user = authenticate_user("jane.doe@example.com", "pw", user_type).unwrap();
        app.dispatch(Action::Login(user));
        app
    }

    // -- Dashboard and public pages --

    #[test]
    fn digits_open_role_logins() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen(), Screen::Login(UserType::Customer));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn footer_keys_navigate_public_pages() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.screen(), Screen::About);
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.screen(), Screen::QaResults);
        // No parent: Esc stays put.
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::QaResults);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn q_quits_from_dashboard() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = logged_in(UserType::Customer);
        press(&mut app, KeyCode::Char('s'));
        key_to_command(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    // -- Login --

    #[test]
    fn login_requires_both_credentials() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "ravi@farm.in");
        press(&mut app, KeyCode::Tab);
        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert_eq!(app.screen(), Screen::Login(UserType::Farmer));
        assert_eq!(app.status, "Please enter both email and password");
    }

    #[test]
    fn farmer_login_loads_collections() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "ravi.kumar@farm.in");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "secret");
        let command = press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::FarmerDashboard);
        assert_eq!(app.state.user.as_ref().unwrap().full_name, "Ravi Kumar");
        match command {
            Some(Command::LoadCollections(id)) => assert_eq!(id, "FARMER_RAVIKUMAR"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(app.busy);
    }

    #[test]
    fn admin_login_loads_all_batches() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('3'));
        type_text(&mut app, "root@herbtrace.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "pw");
        assert!(matches!(
            press(&mut app, KeyCode::Enter),
            Some(Command::LoadAllBatches)
        ));
        assert_eq!(app.screen(), Screen::AdminDashboard);
    }

    #[test]
    fn logout_returns_to_dashboard() {
        let mut app = logged_in(UserType::Customer);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen(), Screen::Dashboard);
        assert!(app.state.user.is_none());
    }

    #[test]
    fn next_login_does_not_see_previous_listing() {
        let mut app = App::default();
        let alice = authenticate_user("alice@farm.in", "pw", UserType::Farmer).unwrap();
        app.dispatch(Action::Login(alice));
        app.apply_outcome(Outcome::Collections(vec![
            serde_json::from_value(serde_json::json!({
                "batchId": "HERBAAA11111",
                "herbName": "Tulsi",
                "quantity": 1.0,
                "farmerId": "FARMER_ALICE",
                "farmerName": "Alice",
            }))
            .unwrap(),
        ]));
        assert_eq!(app.listing().len(), 1);

        press(&mut app, KeyCode::Char('l'));
        let bob = authenticate_user("bob@farm.in", "pw", UserType::Farmer).unwrap();
        let command = app.dispatch(Action::Login(bob));

        assert!(matches!(command, Some(Command::LoadCollections(ref id)) if id == "FARMER_BOB"));
        assert!(app.listing().is_empty());
        assert!(app.batches.is_empty());
    }

    // -- Farmer form --

    #[test]
    fn farmer_form_submits_with_picked_location() {
        let mut app = logged_in(UserType::Farmer);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.screen(), Screen::FarmerForm);

        type_text(&mut app, "Ashwagandha");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12.5");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.farmer_form.focus, FormField::Location);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::LocationPicker);
        type_text(&mut app, "12.9716");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "77.5946");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Bengaluru");
        press(&mut app, KeyCode::Enter);

        // Back on the form with the inputs intact.
        assert_eq!(app.screen(), Screen::FarmerForm);
        assert_eq!(app.farmer_form.herb_name.value, "Ashwagandha");
        assert_eq!(
            app.state.picked_location().unwrap().address.as_deref(),
            Some("Bengaluru")
        );

        app.farmer_form.focus = FormField::Submit;
        match press(&mut app, KeyCode::Enter) {
            Some(Command::SubmitHerb {
                form,
                farmer_id,
                farmer_name,
            }) => {
                assert_eq!(form.herb_name.as_deref(), Some("Ashwagandha"));
                assert_eq!(form.quantity.as_deref(), Some("12.5"));
                assert!(form.location.is_some());
                assert_eq!(farmer_id, "FARMER_JANEDOE");
                assert_eq!(farmer_name, "Jane Doe");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(app.busy);
    }

    #[test]
    fn invalid_location_stays_on_picker() {
        let mut app = logged_in(UserType::Farmer);
        press(&mut app, KeyCode::Char('n'));
        app.farmer_form.focus = FormField::Location;
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "200");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "10");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::LocationPicker);
        assert!(!app.status.is_empty());
    }

    #[test]
    fn space_toggles_organic() {
        let mut app = logged_in(UserType::Farmer);
        press(&mut app, KeyCode::Char('n'));
        app.farmer_form.focus = FormField::Organic;
        press(&mut app, KeyCode::Char(' '));
        assert!(app.farmer_form.organic);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.farmer_form.organic);
    }

    #[test]
    fn submitted_outcome_shows_qr_screen() {
        let mut app = logged_in(UserType::Farmer);
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Tulsi");
        app.apply_outcome(Outcome::Submitted(Ok("HERBABC12345".into())));
        assert_eq!(app.screen(), Screen::QrGenerated);
        assert_eq!(
            app.state.data,
            ScreenData::Batch {
                batch_id: "HERBABC12345".into()
            }
        );
        assert!(app.farmer_form.herb_name.value.is_empty());
    }

    // -- Scanner --

    #[test]
    fn scanner_rejects_malformed_ids() {
        let mut app = logged_in(UserType::Customer);
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "hello");
        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert_eq!(app.screen(), Screen::QrScanner);
    }

    #[test]
    fn scanner_looks_up_batch() {
        let mut app = logged_in(UserType::Customer);
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "herbloyw3v28abcde");
        match press(&mut app, KeyCode::Enter) {
            Some(Command::LookupBatch(id)) => assert_eq!(id, "HERBLOYW3V28ABCDE"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn lookup_hit_opens_details_and_miss_keeps_scanner() {
        let mut app = logged_in(UserType::Customer);
        press(&mut app, KeyCode::Char('s'));

        app.apply_outcome(Outcome::LookedUp {
            batch_id: "HERBX".into(),
            result: Ok(None),
        });
        assert_eq!(app.screen(), Screen::QrScanner);
        assert!(app.status.contains("No herb batch found"));

        let herb = HerbBatch {
            batch_id: "HERBX".into(),
            herb_name: "Neem".into(),
            quantity: 1.0,
            location: None,
            photo: String::new(),
            harvest_date: "1/2/2025".into(),
            blockchain_hash: "0x00".into(),
            farmer_id: "F1".into(),
            farmer_name: "One".into(),
            processing: Vec::new(),
            testing: Vec::new(),
            organic_certified: false,
            quality_grade: "Standard".into(),
        };
        app.apply_outcome(Outcome::LookedUp {
            batch_id: "HERBX".into(),
            result: Ok(Some(herb)),
        });
        assert_eq!(app.screen(), Screen::HerbDetails);
        assert!(matches!(app.state.data, ScreenData::Herb(_)));
    }

    #[test]
    fn lookup_failure_stays_on_scanner() {
        let mut app = logged_in(UserType::Customer);
        press(&mut app, KeyCode::Char('s'));
        app.apply_outcome(Outcome::LookedUp {
            batch_id: "HERBX".into(),
            result: Err(herbtrace_core::Error::Retrieval(
                herbtrace_core::StoreError::Config("down".into()),
            )),
        });
        assert!(app.crash.is_none());
        assert_eq!(app.screen(), Screen::QrScanner);
        assert!(app.status.contains("Failed to retrieve herb data"));
        assert!(!app.busy);
    }

    // -- Error boundary --

    #[test]
    fn retrieval_error_crashes_and_r_reloads() {
        let mut app = logged_in(UserType::Admin);
        app.apply_outcome(Outcome::Batches(Err(herbtrace_core::Error::Retrieval(
            herbtrace_core::StoreError::Config("down".into()),
        ))));
        assert!(app.crash.is_some());

        // Other keys are swallowed while crashed.
        press(&mut app, KeyCode::Char('l'));
        assert!(app.crash.is_some());
        assert_eq!(app.screen(), Screen::AdminDashboard);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.crash.is_none());
        assert_eq!(app.screen(), Screen::Dashboard);
        assert!(app.state.user.is_none());
    }

    #[tokio::test]
    async fn handle_key_forwards_commands() {
        let mut app = logged_in(UserType::Admin);
        let (tx, mut rx) = mpsc::channel::<Command>(8);
        handle_key(&mut app, &tx, key(KeyCode::Char('r'))).await;
        assert!(matches!(rx.try_recv().unwrap(), Command::LoadAllBatches));
    }

    #[tokio::test]
    async fn closed_worker_channel_crashes() {
        let mut app = logged_in(UserType::Admin);
        let (tx, rx) = mpsc::channel::<Command>(8);
        drop(rx);
        handle_key(&mut app, &tx, key(KeyCode::Char('r'))).await;
        assert!(app.crash.is_some());
    }
}
