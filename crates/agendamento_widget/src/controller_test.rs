#[cfg(test)]
mod tests {
    use crate::backend::{BookingBackend, MockBookingBackend};
    use crate::controller::{BookingFormController, DateChangeOutcome, SubmitEvent, SubmitOutcome};
    use crate::models::{SelectOption, SubmissionResult, TimeSlot};
    use crate::page::MemoryPage;
    use agendamento_common::BookingError;
    use agendamento_config::{ElementIds, WidgetConfig, WidgetLabels};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    fn standard_page() -> Arc<Mutex<MemoryPage>> {
        Arc::new(Mutex::new(MemoryPage::standard(
            &ElementIds::default(),
            &WidgetLabels::default(),
            "/agendar/",
        )))
    }

    fn controller<B: BookingBackend>(backend: B) -> BookingFormController<MemoryPage, B> {
        BookingFormController::attach(standard_page(), backend, WidgetConfig::default()).unwrap()
    }

    fn options(
        controller: &BookingFormController<MemoryPage, impl BookingBackend>,
    ) -> Vec<SelectOption> {
        controller.page().lock().unwrap().hour_options().to_vec()
    }

    #[test]
    fn test_attach_requires_every_element() {
        let ids = ElementIds::default();
        for missing in [&ids.date_input, &ids.hour_select, &ids.message, &ids.form] {
            let mut page = MemoryPage::new("/agendar/");
            for id in [&ids.date_input, &ids.hour_select, &ids.message, &ids.form] {
                if id != missing {
                    page = page.with_element(id);
                }
            }
            let result = BookingFormController::attach(
                Arc::new(Mutex::new(page)),
                MockBookingBackend::new(),
                WidgetConfig::default(),
            );
            match result {
                Err(BookingError::MissingElement(id)) => assert_eq!(&id, missing),
                Err(other) => panic!("unexpected error {other}"),
                Ok(_) => panic!("attach succeeded without #{missing}"),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_date_touches_nothing() {
        let mut backend = MockBookingBackend::new();
        backend.expect_fetch_hours().never();
        let controller = controller(backend);

        assert_eq!(controller.on_date_change("").await, DateChangeOutcome::Ignored);
        assert_eq!(controller.page().lock().unwrap().mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_slots_render_in_server_order() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_fetch_hours()
            .withf(|date| date == "2025-05-05")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    TimeSlot::new("09:00", 3),
                    TimeSlot::new("07:30", 10),
                    TimeSlot::new("08:00", 1),
                ])
            });
        let controller = controller(backend);

        assert_eq!(controller.on_date_change("2025-05-05").await, DateChangeOutcome::Loaded(3));

        let options = options(&controller);
        assert_eq!(options.len(), 4);
        assert_eq!(options[0], SelectOption::placeholder("Selecione o horário"));
        let values: Vec<&str> = options[1..].iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["09:00", "07:30", "08:00"]);
        assert_eq!(options[1].label, "09:00 (3 vagas)");
    }

    #[tokio::test]
    async fn test_no_slots_shows_single_placeholder() {
        let mut backend = MockBookingBackend::new();
        backend.expect_fetch_hours().returning(|_| Ok(vec![]));
        let controller = controller(backend);

        assert_eq!(controller.on_date_change("2025-12-25").await, DateChangeOutcome::Empty);
        assert_eq!(
            options(&controller),
            [SelectOption::placeholder("Nenhum horário disponível")]
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_shows_error_placeholder_for_any_cause() {
        let failures: Vec<fn() -> BookingError> = vec![
            || BookingError::HttpError("connection refused".into()),
            || BookingError::ParseError("expected value at line 1 column 1".into()),
            || BookingError::StatusError {
                status: 500,
                url: "http://127.0.0.1:8000/horarios/x/".into(),
            },
        ];

        for make_error in failures {
            let mut backend = MockBookingBackend::new();
            backend.expect_fetch_hours().returning(move |_| Err(make_error()));
            let controller = controller(backend);

            assert_eq!(controller.on_date_change("2025-05-05").await, DateChangeOutcome::Failed);
            assert_eq!(
                options(&controller),
                [SelectOption::placeholder("Erro ao carregar horários")]
            );
        }
    }

    #[tokio::test]
    async fn test_date_change_clears_previous_message() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_submit_form()
            .returning(|_, _| Ok(SubmissionResult::error("Esse horário já está cheio!")));
        backend.expect_fetch_hours().returning(|_| Ok(vec![TimeSlot::new("10:00", 5)]));
        let controller = controller(backend);

        controller.on_form_submit(&mut SubmitEvent::new()).await;
        assert_eq!(
            controller.page().lock().unwrap().message_text(),
            "Esse horário já está cheio!"
        );

        controller.on_date_change("2025-05-06").await;
        assert_eq!(controller.page().lock().unwrap().message_text(), "");
    }

    #[tokio::test]
    async fn test_success_resets_form_and_selector() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_submit_form()
            .withf(|action, fields| {
                action == "/agendar/"
                    && fields.contains(&("nome".to_string(), "Maria Silva".to_string()))
                    && fields.contains(&("hora".to_string(), "07:30".to_string()))
            })
            .times(1)
            .returning(|_, _| Ok(SubmissionResult::success("Agendamento realizado com sucesso!")));
        backend
            .expect_fetch_hours()
            .returning(|_| Ok(vec![TimeSlot::new("07:30", 10)]));
        let controller = controller(backend);
        controller.on_date_change("2025-05-05").await;
        {
            let mut page = controller.page().lock().unwrap();
            page.set_field("nome", "Maria Silva");
            assert!(page.set_field("hora", "07:30"));
            page.set_field("doador", "True");
        }

        let mut event = SubmitEvent::new();
        let outcome = controller.on_form_submit(&mut event).await;

        assert!(event.default_prevented());
        assert_eq!(outcome, SubmitOutcome::Accepted("Agendamento realizado com sucesso!".into()));
        let page = controller.page().lock().unwrap();
        assert_eq!(page.message_text(), "Agendamento realizado com sucesso!");
        assert_eq!(page.message_color(), Some("green"));
        assert_eq!(page.field("nome"), Some(""));
        assert_eq!(page.field("hora"), Some(""));
        assert_eq!(page.field("doador"), Some("False"));
        assert_eq!(
            page.hour_options(),
            &[SelectOption::placeholder("Selecione a data primeiro")]
        );
    }

    #[tokio::test]
    async fn test_new_date_drops_picked_hour() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_fetch_hours()
            .withf(|date| date == "2025-05-05")
            .returning(|_| Ok(vec![TimeSlot::new("07:30", 10)]));
        backend
            .expect_fetch_hours()
            .withf(|date| date == "2025-05-06")
            .returning(|_| Ok(vec![TimeSlot::new("09:00", 4)]));
        backend
            .expect_submit_form()
            .withf(|_, fields| fields.contains(&("hora".to_string(), String::new())))
            .times(1)
            .returning(|_, _| Ok(SubmissionResult::error("Selecione um horário.")));
        let controller = controller(backend);

        controller.on_date_change("2025-05-05").await;
        assert!(controller.page().lock().unwrap().set_field("hora", "07:30"));

        controller.on_date_change("2025-05-06").await;
        {
            let mut page = controller.page().lock().unwrap();
            assert_eq!(page.field("hora"), Some(""));
            // 07:30 is no longer offered
            assert!(!page.set_field("hora", "07:30"));
        }

        let outcome = controller.on_form_submit(&mut SubmitEvent::new()).await;
        assert_eq!(outcome, SubmitOutcome::Rejected("Selecione um horário.".into()));
    }

    #[tokio::test]
    async fn test_lookup_failure_drops_picked_hour() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_fetch_hours()
            .withf(|date| date == "2025-05-05")
            .returning(|_| Ok(vec![TimeSlot::new("07:30", 10)]));
        backend
            .expect_fetch_hours()
            .returning(|_| Err(BookingError::HttpError("connection refused".into())));
        let controller = controller(backend);

        controller.on_date_change("2025-05-05").await;
        assert!(controller.page().lock().unwrap().set_field("hora", "07:30"));
        controller.on_date_change("2025-05-07").await;

        assert_eq!(controller.page().lock().unwrap().field("hora"), Some(""));
    }

    #[tokio::test]
    async fn test_server_error_keeps_form_values() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_submit_form()
            .returning(|_, _| {
                Ok(SubmissionResult::error("Você já possui um agendamento neste mês."))
            });
        backend.expect_fetch_hours().returning(|_| Ok(vec![TimeSlot::new("07:30", 10)]));
        let controller = controller(backend);

        controller.on_date_change("2025-05-05").await;
        {
            let mut page = controller.page().lock().unwrap();
            page.set_field("email", "maria@example.com");
            assert!(page.set_field("hora", "07:30"));
        }
        let before = options(&controller);

        let outcome = controller.on_form_submit(&mut SubmitEvent::new()).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected("Você já possui um agendamento neste mês.".into())
        );
        let page = controller.page().lock().unwrap();
        assert_eq!(page.message_text(), "Você já possui um agendamento neste mês.");
        assert_eq!(page.message_color(), Some("red"));
        assert_eq!(page.field("email"), Some("maria@example.com"));
        assert_eq!(page.field("hora"), Some("07:30"));
        assert_eq!(page.hour_options(), before.as_slice());
    }

    #[tokio::test]
    async fn test_unrecognized_response_is_silent() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_submit_form()
            .returning(|_, _| Ok(SubmissionResult::default()));
        let controller = controller(backend);

        let mut event = SubmitEvent::new();
        assert_eq!(controller.on_form_submit(&mut event).await, SubmitOutcome::Unrecognized);
        assert!(event.default_prevented());
        assert_eq!(controller.page().lock().unwrap().mutation_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_failure_shows_generic_message() {
        let mut backend = MockBookingBackend::new();
        backend
            .expect_submit_form()
            .returning(|_, _| Err(BookingError::HttpError("connection reset".into())));
        let controller = controller(backend);
        controller.page().lock().unwrap().set_field("nome", "João");

        assert_eq!(controller.on_form_submit(&mut SubmitEvent::new()).await, SubmitOutcome::Failed);
        let page = controller.page().lock().unwrap();
        assert_eq!(page.message_text(), "Ocorreu um erro. Tente novamente.");
        assert_eq!(page.message_color(), Some("red"));
        assert_eq!(page.field("nome"), Some("João"));
    }

    /// Backend whose hour lookups complete only when the test releases them.
    struct GatedBackend {
        gates: Mutex<HashMap<String, oneshot::Receiver<Vec<TimeSlot>>>>,
    }

    #[async_trait]
    impl BookingBackend for GatedBackend {
        async fn fetch_hours(&self, date: &str) -> Result<Vec<TimeSlot>, BookingError> {
            let gate = self.gates.lock().unwrap().remove(date);
            match gate {
                Some(rx) => rx.await.map_err(|e| BookingError::HttpError(e.to_string())),
                None => Err(BookingError::HttpError(format!("no gate for {date}"))),
            }
        }

        async fn submit_form(
            &self,
            _action: &str,
            _fields: Vec<(String, String)>,
        ) -> Result<SubmissionResult, BookingError> {
            Ok(SubmissionResult::default())
        }
    }

    async fn overlapping_lookups(
        discard_stale_hours: bool,
    ) -> (Vec<SelectOption>, DateChangeOutcome, DateChangeOutcome) {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let backend = GatedBackend {
            gates: Mutex::new(HashMap::from([
                ("2025-05-05".to_string(), first_rx),
                ("2025-05-06".to_string(), second_rx),
            ])),
        };
        let settings = WidgetConfig {
            discard_stale_hours,
            ..WidgetConfig::default()
        };
        let controller = BookingFormController::attach(standard_page(), backend, settings).unwrap();

        let release = async {
            // the later request answers first...
            second_tx.send(vec![TimeSlot::new("14:00", 2)]).unwrap();
            while !options(&controller).iter().any(|o| o.value == "14:00") {
                tokio::task::yield_now().await;
            }
            tokio::task::yield_now().await;
            // ...and the earlier one last
            first_tx
                .send(vec![TimeSlot::new("07:30", 10), TimeSlot::new("08:00", 9)])
                .unwrap();
        };

        let (first, second, ()) = tokio::join!(
            controller.on_date_change("2025-05-05"),
            controller.on_date_change("2025-05-06"),
            release
        );
        (options(&controller), first, second)
    }

    #[tokio::test]
    async fn test_last_response_to_arrive_wins() {
        let (options, first, second) = overlapping_lookups(false).await;

        assert_eq!(first, DateChangeOutcome::Loaded(2));
        assert_eq!(second, DateChangeOutcome::Loaded(1));
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["", "07:30", "08:00"]);
    }

    #[tokio::test]
    async fn test_stale_guard_keeps_latest_date() {
        let (options, first, second) = overlapping_lookups(true).await;

        assert_eq!(first, DateChangeOutcome::Superseded);
        assert_eq!(second, DateChangeOutcome::Loaded(1));
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["", "14:00"]);
    }
}
