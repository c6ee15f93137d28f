//! End-to-end submission against a local stand-in for the loan application API.
//!
//! Each scenario spawns a small axum server on an ephemeral port and drives the public
//! `HttpApplicationApi` and `SubmissionSequencer` through a completed wizard.

mod common {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use loan_wizard::config::ApiConfig;
    use loan_wizard::workflows::loan_application::{
        ApplicationDraft, DocumentSlot, FieldName, FileRef, HttpApplicationApi,
        LoanApplicationWizard, Notification, Notifier, StepOutcome, UploadedFiles,
    };

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub path: String,
        pub body: Value,
    }

    #[derive(Clone)]
    struct StubState {
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
        create_response: Value,
        failing_section: Option<&'static str>,
    }

    pub struct StubServer {
        pub base_url: String,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl StubServer {
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().expect("stub mutex poisoned").clone()
        }

        pub fn paths(&self) -> Vec<String> {
            self.requests()
                .into_iter()
                .map(|request| request.path)
                .collect()
        }

        pub fn client(&self) -> HttpApplicationApi {
            let config = ApiConfig::new(format!("{}/", self.base_url)).expect("stub url is valid");
            HttpApplicationApi::new(&config)
        }
    }

    async fn create(State(state): State<StubState>) -> Json<Value> {
        state
            .requests
            .lock()
            .expect("stub mutex poisoned")
            .push(RecordedRequest {
                path: "/api/applications/create".to_string(),
                body: Value::Null,
            });
        Json(state.create_response.clone())
    }

    async fn save_section(
        State(state): State<StubState>,
        Path((id, section)): Path<(String, String)>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        state
            .requests
            .lock()
            .expect("stub mutex poisoned")
            .push(RecordedRequest {
                path: format!("/api/applications/{id}/{section}"),
                body,
            });
        if state.failing_section == Some(section.as_str()) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "storage offline" })),
            );
        }
        (StatusCode::OK, Json(json!({ "saved": section })))
    }

    pub async fn spawn_stub(
        create_response: Value,
        failing_section: Option<&'static str>,
    ) -> StubServer {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            requests: requests.clone(),
            create_response,
            failing_section,
        };
        let router = Router::new()
            .route("/api/applications/create", post(create))
            .route("/api/applications/:id/:section", post(save_section))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
        let address = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server");
        });

        StubServer {
            base_url: format!("http://{address}/api"),
            requests,
        }
    }

    pub fn completed_wizard(with_existing_loan: bool) -> LoanApplicationWizard {
        let mut draft = ApplicationDraft::default();
        for (field, value) in [
            (FieldName::FullName, "Meera Nair"),
            (FieldName::PhoneNumber, "9988776655"),
            (FieldName::MaritalStatus, "married"),
            (FieldName::PanNumber, "PQRSX6789Z"),
            (FieldName::Gender, "female"),
            (FieldName::CurrentAddress, "14 Marine Drive, Kochi"),
            (FieldName::PermanentAddress, "14 Marine Drive, Kochi"),
            (FieldName::DateOfBirth, "1988-11-02"),
            (FieldName::OccupationType, "self-employed"),
            (FieldName::TotalWorkExperience, "9.5"),
            (FieldName::MonthlyCompanyIncome, "120000"),
            (FieldName::CompanyName, "Nair Textiles"),
            (FieldName::OfficeAddress, "Broadway, Ernakulam"),
            (FieldName::LoanType, "business"),
            (FieldName::LoanAmount, "1500000"),
            (FieldName::LoanDuration, "5"),
            (FieldName::LoanPurpose, "Second store"),
            (FieldName::ReferenceFullName, "Joseph Thomas"),
            (FieldName::ReferenceRelationship, "Supplier"),
            (FieldName::ReferenceContactNumber, "9090909090"),
            (FieldName::ReferenceAddress, "Market Road, Thrissur"),
        ] {
            draft.set(field, value);
        }
        if with_existing_loan {
            draft.set(FieldName::ExistingLoanLender, "Federal Bank");
            draft.set(FieldName::ExistingLoanOutstandingAmount, "40000");
            draft.set(FieldName::ExistingLoanEmiTenure, "12");
        }

        let mut uploads = UploadedFiles::default();
        uploads
            .attach(DocumentSlot::Photo, vec![FileRef::new("meera.png")])
            .expect("png accepted");

        let mut wizard = LoanApplicationWizard::with_data(draft, uploads);
        loop {
            match wizard.next_step() {
                StepOutcome::EnteredReview => break,
                StepOutcome::Advanced(_) => continue,
                other => panic!("fixture should pass every step, got {other:?}"),
            }
        }
        wizard
    }

    #[derive(Default)]
    pub struct CollectingNotifier {
        events: Mutex<Vec<Notification>>,
    }

    impl CollectingNotifier {
        pub fn events(&self) -> Vec<Notification> {
            self.events.lock().expect("notifier mutex poisoned").clone()
        }
    }

    impl Notifier for CollectingNotifier {
        fn notify(&self, notification: Notification) {
            self.events
                .lock()
                .expect("notifier mutex poisoned")
                .push(notification);
        }
    }
}

use std::sync::Arc;

use common::*;
use serde_json::json;

use loan_wizard::workflows::loan_application::{
    ApiError, ApplicationApi, ApplicationId, LoanApplicationWizard, Notification, Section,
    SubmissionError, SubmissionSequencer,
};

#[tokio::test]
async fn posts_every_section_in_order_under_one_id() {
    let stub = spawn_stub(json!({ "id": "APP-1001", "status": "DRAFT" }), None).await;
    let notifier = Arc::new(CollectingNotifier::default());
    let sequencer = SubmissionSequencer::new(Arc::new(stub.client()), notifier.clone());
    let mut wizard = completed_wizard(true);

    let receipt = sequencer
        .submit(&mut wizard)
        .await
        .expect("submission succeeds");

    assert_eq!(receipt.application_id, ApplicationId("APP-1001".to_string()));
    assert_eq!(
        stub.paths(),
        vec![
            "/api/applications/create",
            "/api/applications/APP-1001/personal-details",
            "/api/applications/APP-1001/employment-details",
            "/api/applications/APP-1001/loan-details",
            "/api/applications/APP-1001/document-details",
            "/api/applications/APP-1001/existing-loan-details",
            "/api/applications/APP-1001/reference-details",
        ]
    );

    let requests = stub.requests();
    assert_eq!(requests[1].body["panNumber"], json!("PQRSX6789Z"));
    assert_eq!(requests[2].body["yearsOfExperience"], json!(9.5));
    assert_eq!(requests[3].body["loanTenure"], json!(5));
    assert_eq!(requests[4].body["photoPath"], json!("meera.png"));
    assert_eq!(requests[4].body["salarySlipPaths"], json!([]));
    assert_eq!(requests[5].body["fullName"], json!(""));
    assert_eq!(requests[5].body["emiTenure"], json!(12));
    assert_eq!(requests[6].body["relationshipWithApplicant"], json!("Supplier"));

    assert_eq!(wizard, LoanApplicationWizard::new());
    assert_eq!(
        notifier.events(),
        vec![Notification::Submitted {
            application_id: ApplicationId("APP-1001".to_string()),
        }]
    );
}

#[tokio::test]
async fn numeric_ids_are_accepted_and_blank_existing_loans_are_skipped() {
    let stub = spawn_stub(json!({ "id": 77 }), None).await;
    let notifier = Arc::new(CollectingNotifier::default());
    let sequencer = SubmissionSequencer::new(Arc::new(stub.client()), notifier.clone());
    let mut wizard = completed_wizard(false);

    let receipt = sequencer
        .submit(&mut wizard)
        .await
        .expect("submission succeeds");

    assert_eq!(receipt.application_id.0, "77");
    let paths = stub.paths();
    assert_eq!(paths.len(), 6);
    assert!(!paths.iter().any(|path| path.ends_with("existing-loan-details")));
    assert_eq!(
        paths.last().map(String::as_str),
        Some("/api/applications/77/reference-details")
    );
}

#[tokio::test]
async fn server_error_stops_remaining_sections() {
    let stub = spawn_stub(json!({ "id": "APP-2002" }), Some("loan-details")).await;
    let notifier = Arc::new(CollectingNotifier::default());
    let sequencer = SubmissionSequencer::new(Arc::new(stub.client()), notifier.clone());
    let mut wizard = completed_wizard(true);
    let before = wizard.clone();

    let err = sequencer
        .submit(&mut wizard)
        .await
        .expect_err("loan details rejected");

    match err {
        SubmissionError::Section {
            section,
            saved,
            source: ApiError::Status { status, .. },
            ..
        } => {
            assert_eq!(section, Section::LoanDetails);
            assert_eq!(
                saved,
                vec![Section::PersonalDetails, Section::EmploymentDetails]
            );
            assert_eq!(status, 500);
        }
        other => panic!("expected loan-details failure, got {other:?}"),
    }

    assert_eq!(stub.paths().len(), 4);
    assert_eq!(wizard, before);
    assert_eq!(notifier.events(), vec![Notification::SubmissionFailed]);
}

#[tokio::test]
async fn create_without_id_is_rejected() {
    let stub = spawn_stub(json!({ "status": "DRAFT" }), None).await;

    let err = stub
        .client()
        .create_application()
        .await
        .expect_err("missing id");

    assert!(matches!(err, ApiError::MissingApplicationId));
}

#[tokio::test]
async fn unreachable_api_reports_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let address = listener.local_addr().expect("probe address");
    drop(listener);

    let config = loan_wizard::config::ApiConfig::new(format!("http://{address}/api"))
        .expect("valid url");
    let notifier = Arc::new(CollectingNotifier::default());
    let sequencer = SubmissionSequencer::new(
        Arc::new(loan_wizard::workflows::loan_application::HttpApplicationApi::new(&config)),
        notifier.clone(),
    );
    let mut wizard = completed_wizard(false);

    let err = sequencer
        .submit(&mut wizard)
        .await
        .expect_err("connection refused");

    assert!(matches!(
        err,
        SubmissionError::Create(ApiError::Transport { .. })
    ));
    assert!(wizard.show_review());
    assert_eq!(notifier.events(), vec![Notification::SubmissionFailed]);
}
