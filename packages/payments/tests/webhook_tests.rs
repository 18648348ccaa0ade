// ABOUTME: Integration tests for the payment webhook pipeline
// ABOUTME: Tests verified, rejected, unreachable, and redelivered notifications end to end

use async_trait::async_trait;
use mockall::mock;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use lispbook_core::is_well_formed_token;
use lispbook_payments::{
    download_links, EmailMessage, FormFields, Mailer, PaymentResult, PaymentVerifier,
    RejectionLog, VerificationOutcome, WebhookConfig, WebhookHandler, WebhookOutcome,
};
use lispbook_storage::{FileLedger, PurchaseLedger, TokenValidator};

mock! {
    Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, message: &EmailMessage) -> PaymentResult<()>;
    }
}

/// Verifier that answers every request with a fixed outcome and remembers what it was sent
struct StubVerifier {
    outcome: VerificationOutcome,
    seen: Mutex<Vec<String>>,
}

impl StubVerifier {
    fn new(outcome: VerificationOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl PaymentVerifier for StubVerifier {
    async fn verify(&self, message: &str) -> VerificationOutcome {
        self.seen.lock().unwrap().push(message.to_string());
        self.outcome.clone()
    }
}

struct Harness {
    handler: WebhookHandler,
    ledger: Arc<FileLedger>,
    rejections: Arc<RejectionLog>,
    _dir: TempDir,
}

fn setup(verifier: Arc<StubVerifier>, mailer: MockMailer) -> Harness {
    let dir = TempDir::new().unwrap();
    let ledger = Arc::new(FileLedger::new(dir.path().join("purchases.txt")));
    let rejections = Arc::new(RejectionLog::new(dir.path().join("ipn_errors.txt")));

    let handler = WebhookHandler::new(
        ledger.clone(),
        verifier,
        Arc::new(mailer),
        rejections.clone(),
        WebhookConfig {
            public_url: "https://buildyourownlisp.com".to_string(),
            mail_from: "books@buildyourownlisp.com".to_string(),
        },
    );

    Harness {
        handler,
        ledger,
        rejections,
        _dir: dir,
    }
}

fn notification() -> FormFields {
    FormFields::parse(
        b"mc_gross=4.99&txn_id=61E67681CH3238416&payer_email=buyer%40example.com&payment_status=Completed",
    )
}

#[tokio::test]
async fn test_verified_notification_issues_token_and_emails_links() {
    let verifier = StubVerifier::new(VerificationOutcome::Verified);
    let sent = Arc::new(Mutex::new(Vec::<EmailMessage>::new()));

    let mut mailer = MockMailer::new();
    let sink = sent.clone();
    mailer.expect_send().times(1).returning(move |message| {
        sink.lock().unwrap().push(message.clone());
        Ok(())
    });

    let harness = setup(verifier.clone(), mailer);
    let outcome = harness.handler.handle(&notification()).await.unwrap();

    let token = match outcome {
        WebhookOutcome::Issued { token, emailed } => {
            assert!(emailed);
            token
        }
        other => panic!("expected a token, got {:?}", other),
    };
    assert!(is_well_formed_token(&token));

    // Exactly one new ledger line with the new token
    let records = harness.ledger.records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].token, token);

    // The email goes to the buyer and carries three links with that token
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "buyer@example.com");
    let links = download_links("https://buildyourownlisp.com", &token);
    assert_eq!(links.len(), 3);
    for link in links {
        assert!(sent[0].text.contains(&link));
    }

    // Verification echoed the fields in received order
    assert_eq!(
        verifier.seen.lock().unwrap().as_slice(),
        &["mc_gross=4.99&txn_id=61E67681CH3238416&payer_email=buyer%40example.com&payment_status=Completed&cmd=_notify-validate".to_string()]
    );

    let validator = TokenValidator::new(harness.ledger.clone());
    assert!(validator.is_valid_now(&token).await.unwrap());
}

#[tokio::test]
async fn test_rejected_notification_is_logged_not_issued() {
    let verifier = StubVerifier::new(VerificationOutcome::Rejected {
        response: "INVALID".to_string(),
    });
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(0);

    let harness = setup(verifier, mailer);
    let fields = notification();
    let outcome = harness.handler.handle(&fields).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Rejected);
    assert!(harness.ledger.records().await.unwrap().is_empty());

    let log = std::fs::read_to_string(harness.rejections.path()).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains(&fields.as_received()));
}

#[tokio::test]
async fn test_unreachable_processor_counts_as_rejected() {
    let verifier = StubVerifier::new(VerificationOutcome::Unreachable {
        reason: "operation timed out".to_string(),
    });
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(0);

    let harness = setup(verifier, mailer);
    let outcome = harness.handler.handle(&notification()).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Rejected);
    assert!(harness.ledger.records().await.unwrap().is_empty());
    assert!(harness.rejections.path().exists());
}

#[tokio::test]
async fn test_redelivery_issues_second_token() {
    let verifier = StubVerifier::new(VerificationOutcome::Verified);
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(2).returning(|_| Ok(()));

    let harness = setup(verifier, mailer);
    let fields = notification();

    let first = harness.handler.handle(&fields).await.unwrap();
    let second = harness.handler.handle(&fields).await.unwrap();

    let (WebhookOutcome::Issued { token: a, .. }, WebhookOutcome::Issued { token: b, .. }) =
        (first, second)
    else {
        panic!("both deliveries should issue tokens");
    };
    assert_ne!(a, b);

    let validator = TokenValidator::new(harness.ledger.clone());
    assert!(validator.is_valid_now(&a).await.unwrap());
    assert!(validator.is_valid_now(&b).await.unwrap());
    assert_eq!(harness.ledger.records().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_mail_failure_still_issues_token() {
    let verifier = StubVerifier::new(VerificationOutcome::Verified);
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(1).returning(|_| {
        Err(lispbook_payments::PaymentError::Mail("smtp down".to_string()))
    });

    let harness = setup(verifier, mailer);
    let outcome = harness.handler.handle(&notification()).await.unwrap();

    assert!(matches!(outcome, WebhookOutcome::Issued { emailed: false, .. }));
    assert_eq!(harness.ledger.records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_payer_email_still_issues_token() {
    let verifier = StubVerifier::new(VerificationOutcome::Verified);
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(0);

    let harness = setup(verifier, mailer);
    let fields = FormFields::parse(b"txn_id=1&payment_status=Completed");
    let outcome = harness.handler.handle(&fields).await.unwrap();

    assert!(matches!(outcome, WebhookOutcome::Issued { emailed: false, .. }));
    assert_eq!(harness.ledger.records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ledger_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    // A directory where the ledger file should be makes every append fail
    let ledger_path = dir.path().join("purchases.txt");
    std::fs::create_dir(&ledger_path).unwrap();

    let mut mailer = MockMailer::new();
    mailer.expect_send().times(0);

    let handler = WebhookHandler::new(
        Arc::new(FileLedger::new(ledger_path)),
        StubVerifier::new(VerificationOutcome::Verified),
        Arc::new(mailer),
        Arc::new(RejectionLog::new(dir.path().join("ipn_errors.txt"))),
        WebhookConfig {
            public_url: "http://localhost:5000".to_string(),
            mail_from: "books@example.com".to_string(),
        },
    );

    let result = handler.handle(&notification()).await;
    assert!(matches!(
        result,
        Err(lispbook_payments::PaymentError::Ledger(_))
    ));
}

#[tokio::test]
async fn test_windows_1252_notification_echoed_unchanged() {
    let verifier = StubVerifier::new(VerificationOutcome::Verified);
    let mut mailer = MockMailer::new();
    mailer.expect_send().times(1).returning(|_| Ok(()));

    let harness = setup(verifier.clone(), mailer);
    let fields = FormFields::parse(
        b"first_name=Jos%E9&memo=gift%20copy&charset=windows-1252&payer_email=jose%40example.com",
    );
    let outcome = harness.handler.handle(&fields).await.unwrap();

    assert!(matches!(outcome, WebhookOutcome::Issued { emailed: true, .. }));
    assert_eq!(
        verifier.seen.lock().unwrap().as_slice(),
        &["first_name=Jos%E9&memo=gift%20copy&charset=windows-1252&payer_email=jose%40example.com&cmd=_notify-validate".to_string()]
    );
}
