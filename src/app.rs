//! Application state and core logic

use crate::config::DeskConfig;
use crate::error::SubmitError;
use crate::remote::{HttpRegistrationClient, RegistrationClient};
use crate::state::forms::presets::{course_schema, dormitory_schema};
use crate::state::{AppState, FormKind, SubmitOutcome, SubmitStart, View, WishPhase};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Delay between a successful registration and returning to the menu
pub const RETURN_TO_MENU_DELAY: Duration = Duration::from_secs(2);

/// A remote call running on a background task
struct InFlight {
    kind: FormKind,
    result: oneshot::Receiver<Result<(), SubmitError>>,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Registration endpoint client
    client: Arc<dyn RegistrationClient>,
    /// Submissions waiting on the endpoint, at most one per form
    in_flight: Vec<InFlight>,
    /// Which accepted form to leave, and when
    return_to_menu_at: Option<(FormKind, Instant)>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance talking to the configured endpoint
    pub fn new(config: &DeskConfig) -> Result<Self> {
        let client = Arc::new(HttpRegistrationClient::new(config.api_url()));
        tracing::info!("registration API at {}", client.base_url());
        Self::with_client(config, client)
    }

    /// Create an App with a specific client
    pub fn with_client(config: &DeskConfig, client: Arc<dyn RegistrationClient>) -> Result<Self> {
        let state = AppState::new(dormitory_schema(config)?, course_schema(config)?);
        Ok(Self {
            state,
            client,
            in_flight: Vec::new(),
            return_to_menu_at: None,
            quit: false,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_submitting(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Per-frame housekeeping: animations, finished submissions, deferred
    /// navigation
    pub fn tick(&mut self) {
        self.state.wish_card.update();
        self.poll_submissions();

        if let Some((kind, at)) = self.return_to_menu_at {
            if Instant::now() >= at {
                self.return_to_menu_at = None;
                if self.state.current_view == kind.view() {
                    self.navigate(View::Menu);
                }
            }
        }
    }

    /// Feed every finished background submission into its engine
    pub fn poll_submissions(&mut self) -> Vec<(FormKind, SubmitOutcome)> {
        let mut finished = Vec::new();
        let mut pending = Vec::new();

        for mut in_flight in std::mem::take(&mut self.in_flight) {
            let result = match in_flight.result.try_recv() {
                Ok(result) => result,
                Err(oneshot::error::TryRecvError::Empty) => {
                    pending.push(in_flight);
                    continue;
                }
                Err(oneshot::error::TryRecvError::Closed) => Err(SubmitError::Transport(
                    "submission task ended without a result".to_string(),
                )),
            };
            finished.push((in_flight.kind, self.finish_submission(in_flight.kind, result)));
        }

        self.in_flight = pending;
        finished
    }

    fn finish_submission(
        &mut self,
        kind: FormKind,
        result: Result<(), SubmitError>,
    ) -> SubmitOutcome {
        let page = self.state.form_mut(kind);
        let outcome = page.engine.finish_submit(result);
        if outcome == SubmitOutcome::Succeeded {
            page.active_field_index = 0;
            self.return_to_menu_at = Some((kind, Instant::now() + RETURN_TO_MENU_DELAY));
        }
        outcome
    }

    /// Start submitting a form on a background task
    pub fn submit(&mut self, kind: FormKind) -> Option<SubmitOutcome> {
        let pending = match self.state.form_mut(kind).engine.begin_submit() {
            SubmitStart::Skipped(SubmitOutcome::AlreadyInFlight) => {
                self.state.status_message = Some("Already submitting, please wait".to_string());
                return Some(SubmitOutcome::AlreadyInFlight);
            }
            SubmitStart::Skipped(outcome) => return Some(outcome),
            SubmitStart::Ready(pending) => pending,
        };

        let (tx, rx) = oneshot::channel();
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client.register(&pending.endpoint, &pending.payload).await;
            // The receiver is gone only if the app is shutting down
            let _ = tx.send(result);
        });

        self.in_flight.push(InFlight { kind, result: rx });
        None
    }

    fn navigate(&mut self, view: View) {
        self.state.status_message = None;
        self.state.current_view = view;
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }

        match self.state.current_view {
            View::Menu => self.handle_menu_key(key),
            View::Dormitory => self.handle_form_key(FormKind::Dormitory, key),
            View::Course => self.handle_form_key(FormKind::Course, key),
            View::WishCard => self.handle_wish_card_key(key),
        }
        Ok(())
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.state.menu_next(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.state.menu_prev(),
            KeyCode::Enter => {
                let view = self.state.selected_menu_view();
                self.navigate(view);
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, kind: FormKind, key: KeyEvent) {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.submit(kind);
            return;
        }

        let page = self.state.form_mut(kind);
        let result = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                page.next_field();
                Ok(())
            }
            KeyCode::BackTab | KeyCode::Up => {
                page.prev_field();
                Ok(())
            }
            KeyCode::Right => {
                page.next_option();
                Ok(())
            }
            KeyCode::Left => {
                page.prev_option();
                Ok(())
            }
            KeyCode::Enter if page.is_submit_row_active() => {
                self.submit(kind);
                return;
            }
            KeyCode::Enter => page.push_newline(),
            KeyCode::Char(' ') => page.activate(),
            KeyCode::Char(c) => page.push_char(c),
            KeyCode::Backspace => page.pop_char(),
            KeyCode::Esc => {
                self.return_to_menu_at = None;
                self.navigate(View::Menu);
                return;
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            tracing::warn!("form input rejected: {err}");
        }
    }

    fn handle_wish_card_key(&mut self, key: KeyEvent) {
        let card = &mut self.state.wish_card;
        match card.phase {
            WishPhase::Compose => match key.code {
                KeyCode::Tab | KeyCode::BackTab => card.active_field.toggle(),
                KeyCode::Enter => {
                    if !card.reveal() {
                        self.state.status_message = Some("Type a name first".to_string());
                    }
                }
                KeyCode::Char(c) => card.active_text_mut().push(c),
                KeyCode::Backspace => {
                    card.active_text_mut().pop();
                }
                KeyCode::Esc => self.navigate(View::Menu),
                _ => {}
            },
            WishPhase::Revealed => match key.code {
                KeyCode::Char('e') | KeyCode::Enter => card.edit(),
                KeyCode::Esc => self.navigate(View::Menu),
                _ => card.finish_reveal(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockRegistrationClient;
    use crate::state::{FieldValue, SubmissionStatus};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with(client: MockRegistrationClient) -> App {
        App::with_client(&DeskConfig::default(), Arc::new(client)).unwrap()
    }

    fn fill_course(app: &mut App) {
        let engine = &mut app.state.course.engine;
        engine.set_field("fullName", FieldValue::text("Alice")).unwrap();
        engine
            .set_field("email", FieldValue::text("alice@example.com"))
            .unwrap();
        engine
            .set_field("phone", FieldValue::text("0912345678"))
            .unwrap();
        engine.toggle_multi_choice("courses", "Data Science").unwrap();
        engine
            .set_field("startDate", FieldValue::text("2026-11-02"))
            .unwrap();
        engine
            .set_field("experience", FieldValue::choice("Beginner"))
            .unwrap();
        engine
            .set_field("agreeToTerms", FieldValue::Bool(true))
            .unwrap();
    }

    fn fill_dormitory(app: &mut App) {
        let engine = &mut app.state.dormitory.engine;
        engine.set_field("fullName", FieldValue::text("Bob")).unwrap();
        engine
            .set_field("studentId", FieldValue::text("UGR/4321/16"))
            .unwrap();
        engine
            .set_field("email", FieldValue::text("bob@aau.edu.et"))
            .unwrap();
        engine
            .set_field("phone", FieldValue::text("0711223344"))
            .unwrap();
        engine.set_field("gender", FieldValue::choice("Male")).unwrap();
        engine
            .set_field("roomType", FieldValue::choice("Single"))
            .unwrap();
        engine
            .set_field("arrivalDate", FieldValue::text("2026-09-01"))
            .unwrap();
        engine
            .set_field("departureDate", FieldValue::text("2027-06-30"))
            .unwrap();
        engine
            .set_field("agreeToTerms", FieldValue::Bool(true))
            .unwrap();
    }

    async fn wait_for_outcomes(app: &mut App, count: usize) -> Vec<(FormKind, SubmitOutcome)> {
        let mut outcomes = Vec::new();
        for _ in 0..100 {
            outcomes.extend(app.poll_submissions());
            if outcomes.len() >= count {
                return outcomes;
            }
            tokio::task::yield_now().await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("submission never finished");
    }

    async fn wait_for_outcome(app: &mut App) -> SubmitOutcome {
        wait_for_outcomes(app, 1).await[0].1
    }

    mod navigation {
        use super::*;

        #[tokio::test]
        async fn test_menu_enter_opens_selected_view() {
            let mut app = app_with(MockRegistrationClient::new());
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.state.current_view, View::Course);

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert_eq!(app.state.current_view, View::Menu);
        }

        #[tokio::test]
        async fn test_ctrl_c_quits() {
            let mut app = app_with(MockRegistrationClient::new());
            app.handle_key(ctrl('c')).await.unwrap();
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn test_typing_into_form() {
            let mut app = app_with(MockRegistrationClient::new());
            app.state.current_view = View::Dormitory;
            for c in "Bo".chars() {
                app.handle_key(key(KeyCode::Char(c))).await.unwrap();
            }
            assert_eq!(
                app.state.dormitory.engine.value("fullName"),
                Some(&FieldValue::text("Bo"))
            );
        }
    }

    mod submission {
        use super::*;

        #[tokio::test]
        async fn test_invalid_form_is_not_sent() {
            let mut client = MockRegistrationClient::new();
            client.expect_register().times(0);
            let mut app = app_with(client);
            app.state.current_view = View::Course;

            app.handle_key(ctrl('s')).await.unwrap();

            assert!(!app.is_submitting());
            assert!(matches!(
                app.state.course.engine.status(),
                SubmissionStatus::Failed(_)
            ));
        }

        #[tokio::test]
        async fn test_success_schedules_return_to_menu() {
            let mut client = MockRegistrationClient::new();
            client
                .expect_register()
                .times(1)
                .returning(|_, _| Ok(()));
            let mut app = app_with(client);
            app.state.current_view = View::Course;
            fill_course(&mut app);

            assert_eq!(app.submit(FormKind::Course), None);
            assert!(app.is_submitting());

            assert_eq!(wait_for_outcome(&mut app).await, SubmitOutcome::Succeeded);
            assert!(app.return_to_menu_at.is_some());
            assert_eq!(
                app.state.course.engine.values(),
                &app.state.course.engine.schema().default_values()
            );

            app.return_to_menu_at = Some((FormKind::Course, Instant::now()));
            app.tick();
            assert_eq!(app.state.current_view, View::Menu);
        }

        #[tokio::test]
        async fn test_return_to_menu_only_from_that_form() {
            let mut app = app_with(MockRegistrationClient::new());
            app.state.current_view = View::Dormitory;
            app.return_to_menu_at = Some((FormKind::Course, Instant::now()));
            app.tick();
            assert_eq!(app.state.current_view, View::Dormitory);
            assert!(app.return_to_menu_at.is_none());
        }

        #[tokio::test]
        async fn test_both_forms_can_submit_at_once() {
            let mut client = MockRegistrationClient::new();
            client
                .expect_register()
                .times(2)
                .returning(|_, _| Ok(()));
            let mut app = app_with(client);
            fill_dormitory(&mut app);
            fill_course(&mut app);

            assert_eq!(app.submit(FormKind::Dormitory), None);
            assert_eq!(app.submit(FormKind::Course), None);

            let mut outcomes = wait_for_outcomes(&mut app, 2).await;
            outcomes.sort_by_key(|(kind, _)| *kind == FormKind::Course);
            assert_eq!(
                outcomes,
                vec![
                    (FormKind::Dormitory, SubmitOutcome::Succeeded),
                    (FormKind::Course, SubmitOutcome::Succeeded),
                ]
            );

            assert!(!app.is_submitting());
            for page in [&app.state.dormitory, &app.state.course] {
                assert!(!page.engine.is_submitting());
                assert!(matches!(
                    page.engine.status(),
                    SubmissionStatus::Succeeded(_)
                ));
            }

            // reset to defaults, so a new attempt is validated rather than refused
            assert_eq!(
                app.submit(FormKind::Dormitory),
                Some(SubmitOutcome::Invalid)
            );
        }

        #[tokio::test]
        async fn test_second_submit_while_in_flight_is_rejected() {
            let mut client = MockRegistrationClient::new();
            client
                .expect_register()
                .times(1)
                .returning(|_, _| Ok(()));
            let mut app = app_with(client);
            fill_course(&mut app);

            assert_eq!(app.submit(FormKind::Course), None);
            assert_eq!(
                app.submit(FormKind::Course),
                Some(SubmitOutcome::AlreadyInFlight)
            );
            assert!(app.state.status_message.is_some());

            wait_for_outcome(&mut app).await;
        }

        #[tokio::test]
        async fn test_failure_keeps_values() {
            let mut client = MockRegistrationClient::new();
            client.expect_register().returning(|_, _| {
                Err(SubmitError::Rejected {
                    status: 400,
                    message: Some("Course is full".to_string()),
                })
            });
            let mut app = app_with(client);
            fill_course(&mut app);

            app.submit(FormKind::Course);
            assert_eq!(wait_for_outcome(&mut app).await, SubmitOutcome::Failed);
            assert_eq!(
                app.state.course.engine.status(),
                &SubmissionStatus::Failed("Course is full".to_string())
            );
            assert_eq!(
                app.state.course.engine.value("fullName"),
                Some(&FieldValue::text("Alice"))
            );
            assert!(app.return_to_menu_at.is_none());
        }
    }

    mod wish_card {
        use super::*;

        #[tokio::test]
        async fn test_reveal_and_edit() {
            let mut app = app_with(MockRegistrationClient::new());
            app.state.current_view = View::WishCard;

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(!app.state.wish_card.is_revealed());
            assert!(app.state.status_message.is_some());

            app.handle_key(key(KeyCode::Char('S'))).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(app.state.wish_card.is_revealed());

            app.handle_key(key(KeyCode::Char('e'))).await.unwrap();
            assert!(!app.state.wish_card.is_revealed());
            assert_eq!(app.state.wish_card.name, "S");
        }
    }
}
