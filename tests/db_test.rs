mod common;

use common::{create_test_db, create_test_db_with_url};
use sqlx::Connection;
use gitapath::{
    db::{FederatedIdentity, FederatedMatch, PASSWORD_PROVIDER},
    quiz::{QuizQuestion, QuizRun, QuizSet},
};

fn question(text: &str, options: [&str; 4], answer: &str) -> QuizQuestion {
    QuizQuestion {
        id: None,
        question_text: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer: answer.to_string(),
        explanation: Some(format!("{answer} is correct")),
    }
}

fn gita_questions() -> Vec<QuizQuestion> {
    vec![
        question(
            "Who is the speaker of Bhagavad Gita?",
            ["Arjuna", "Krishna", "Bhishma", "Duryodhana"],
            "Krishna",
        ),
        question(
            "How many chapters are there in Bhagavad Gita?",
            ["12", "15", "18", "20"],
            "18",
        ),
    ]
}

fn google_identity(subject: &str, email: &str) -> FederatedIdentity {
    FederatedIdentity {
        provider: "google.com".to_string(),
        subject: subject.to_string(),
        email: email.to_string(),
        display_name: "Google User".to_string(),
        photo_url: Some("https://example.com/photo.png".to_string()),
        email_verified: true,
    }
}

#[tokio::test]
async fn migrations_are_recorded() {
    let db = create_test_db().await;
    assert!(db.migration_applied("V1").await.unwrap());
    assert!(db.migration_applied("V2").await.unwrap());
    assert!(db.migration_applied("V3").await.unwrap());
    assert!(!db.migration_applied("V99").await.unwrap());
}

#[tokio::test]
async fn stored_quiz_keeps_question_order_and_fields() {
    let db = create_test_db().await;
    let id = db.create_quiz("Gita basics", &gita_questions(), None).await.unwrap();

    let quiz = db.get_quiz(&id).await.unwrap().expect("quiz exists");
    assert_eq!(quiz.title, "Gita basics");
    assert_eq!(quiz.questions, gita_questions());
    assert!(db.get_quiz("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn quizzes_are_listed_in_creation_order() {
    let db = create_test_db().await;
    assert_eq!(db.count_quizzes().await.unwrap(), 0);
    assert!(db.list_quizzes().await.unwrap().is_empty());

    let first = db.create_quiz("First", &gita_questions(), None).await.unwrap();
    let second = db.create_quiz("Second", &gita_questions()[..1], None).await.unwrap();

    assert_eq!(db.count_quizzes().await.unwrap(), 2);
    let listed = db.list_quizzes().await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert_eq!(listed[0].questions.len(), 2);
    assert_eq!(listed[1].questions.len(), 1);
}

#[tokio::test]
async fn summaries_carry_question_count_and_author() {
    let db = create_test_db().await;
    let (admin_id, _) = db
        .create_user("admin@example.com", "secret-password", "Admin")
        .await
        .unwrap();
    db.create_quiz("By admin", &gita_questions(), Some(admin_id)).await.unwrap();
    db.create_quiz("Seeded", &gita_questions()[..1], None).await.unwrap();

    let summaries = db.quiz_summaries().await.unwrap();
    assert_eq!(summaries.len(), 2);
    let by_admin = summaries.iter().find(|s| s.title == "By admin").unwrap();
    assert_eq!(by_admin.question_count, 2);
    assert_eq!(by_admin.author.as_deref(), Some("Admin"));
    let seeded = summaries.iter().find(|s| s.title == "Seeded").unwrap();
    assert_eq!(seeded.question_count, 1);
    assert_eq!(seeded.author, None);
}

#[tokio::test]
async fn failed_import_stores_nothing() {
    let (db, url) = create_test_db_with_url().await;
    let mut conn = sqlx::SqliteConnection::connect(&url).await.unwrap();
    sqlx::raw_sql(
        r#"CREATE TRIGGER refuse_broken BEFORE INSERT ON quizzes WHEN NEW.title = 'Broken'
           BEGIN SELECT RAISE(ABORT, 'refused'); END;"#,
    )
    .execute(&mut conn)
    .await
    .unwrap();
    conn.close().await.unwrap();

    let quizzes = ["Gita basics", "Broken"].map(|title| QuizSet {
        id: String::new(),
        title: title.to_string(),
        questions: gita_questions(),
    });

    assert!(db.import_quizzes(&quizzes, None).await.is_err());
    assert_eq!(db.count_quizzes().await.unwrap(), 0);

    let ids = db.import_quizzes(&quizzes[..1], None).await.unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(db.count_quizzes().await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_a_quiz_removes_its_runs() {
    let db = create_test_db().await;
    let id = db.create_quiz("Gita basics", &gita_questions(), None).await.unwrap();
    let token = db.create_run(&id, &QuizRun::new()).await.unwrap();

    assert!(db.delete_quiz(&id).await.unwrap());
    assert!(!db.delete_quiz(&id).await.unwrap());
    assert!(db.get_run(&token).await.unwrap().is_none());
    assert_eq!(db.count_quizzes().await.unwrap(), 0);
}

#[tokio::test]
async fn run_state_is_saved_and_restored() {
    let db = create_test_db().await;
    let id = db.create_quiz("Gita basics", &gita_questions(), None).await.unwrap();
    let quiz = db.get_quiz(&id).await.unwrap().unwrap();

    let mut run = QuizRun::new();
    let token = db.create_run(&id, &run).await.unwrap();
    run.submit_answer(&quiz, "Krishna");
    assert!(db.save_run(&token, 0, &run).await.unwrap());

    let stored = db.get_run(&token).await.unwrap().expect("run exists");
    assert_eq!(stored.quiz_id, id);
    assert_eq!(stored.run, run);
    assert_eq!(stored.run.score(), 1);
    assert_eq!(stored.version, 1);
    assert!(db.get_run("unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn stale_run_save_is_refused() {
    let db = create_test_db().await;
    let id = db.create_quiz("Gita basics", &gita_questions(), None).await.unwrap();
    let quiz = db.get_quiz(&id).await.unwrap().unwrap();
    let token = db.create_run(&id, &QuizRun::new()).await.unwrap();

    let loaded = db.get_run(&token).await.unwrap().expect("run exists");
    let mut first = loaded.run.clone();
    first.submit_answer(&quiz, "Krishna");
    let mut second = loaded.run.clone();
    second.submit_answer(&quiz, "Arjuna");

    assert!(db.save_run(&token, loaded.version, &first).await.unwrap());
    assert!(!db.save_run(&token, loaded.version, &second).await.unwrap());

    let stored = db.get_run(&token).await.unwrap().expect("run exists");
    assert_eq!(stored.run, first);
    assert_eq!(stored.run.score(), 1);
}

#[tokio::test]
async fn password_users_can_sign_in() {
    let db = create_test_db().await;
    let (user_id, _) = db
        .create_user("arjuna@example.com", "secret-password", "Arjuna")
        .await
        .unwrap();

    assert!(db.email_exists("arjuna@example.com").await.unwrap());
    assert!(!db.email_exists("bhima@example.com").await.unwrap());
    assert!(db.verify_user_password("arjuna@example.com", "secret-password").await.unwrap());
    assert!(!db.verify_user_password("arjuna@example.com", "nope").await.unwrap());
    assert!(!db.verify_user_password("bhima@example.com", "secret-password").await.unwrap());

    let session = db.create_user_session(user_id).await.unwrap();
    let user = db.get_user_by_session(&session).await.unwrap().unwrap();
    assert_eq!(user.id, user_id);
    assert!(!user.is_admin);

    db.delete_user_session(&session).await.unwrap();
    assert!(db.get_user_by_session(&session).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_emails_are_rejected_by_the_store() {
    let db = create_test_db().await;
    db.create_user("arjuna@example.com", "secret-password", "Arjuna")
        .await
        .unwrap();
    assert!(db
        .create_user("arjuna@example.com", "other-password", "Arjuna 2")
        .await
        .is_err());
}

#[tokio::test]
async fn verification_token_can_be_regenerated_until_verified() {
    let db = create_test_db().await;
    let (_, first) = db
        .create_user("arjuna@example.com", "secret-password", "Arjuna")
        .await
        .unwrap();

    let second = db
        .regenerate_verification_token("arjuna@example.com")
        .await
        .unwrap()
        .expect("unverified user gets a new token");
    assert_ne!(first, second);
    assert!(!db.verify_email_token(&first).await.unwrap());
    assert!(db.verify_email_token(&second).await.unwrap());
    assert!(db
        .regenerate_verification_token("arjuna@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn google_identity_creates_then_reuses_a_user() {
    let db = create_test_db().await;
    let identity = google_identity("google-sub-1", "karna@example.com");

    let FederatedMatch::User(created) = db.find_or_create_federated_user(&identity).await.unwrap()
    else {
        panic!("a new identity creates a user");
    };
    let again = db.find_or_create_federated_user(&identity).await.unwrap();
    assert_eq!(again, FederatedMatch::User(created));

    let profile = db.user_profile(created).await.unwrap().unwrap();
    assert_eq!(profile.display_name, "Google User");
    assert!(profile.email_verified);
    assert_eq!(profile.providers, vec!["google.com".to_string()]);
    // Federated-only accounts have no password to check.
    assert!(!db.verify_user_password("karna@example.com", "").await.unwrap());
}

#[tokio::test]
async fn google_identity_links_to_existing_email() {
    let db = create_test_db().await;
    let (user_id, token) = db
        .create_user("arjuna@example.com", "secret-password", "Arjuna")
        .await
        .unwrap();
    assert!(db.verify_email_token(&token).await.unwrap());

    let linked = db
        .find_or_create_federated_user(&google_identity("google-sub-2", "Arjuna@Example.com"))
        .await
        .unwrap();
    assert_eq!(linked, FederatedMatch::User(user_id));

    let profile = db.user_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.display_name, "Arjuna");
    assert!(profile.email_verified);
    assert_eq!(profile.photo_url.as_deref(), Some("https://example.com/photo.png"));
    assert_eq!(
        profile.providers,
        vec!["google.com".to_string(), PASSWORD_PROVIDER.to_string()]
    );
}

#[tokio::test]
async fn unverified_google_email_does_not_link_to_an_account() {
    let db = create_test_db().await;
    let (victim, token) = db
        .create_user("victim@example.com", "secret-password", "Victim")
        .await
        .unwrap();
    assert!(db.verify_email_token(&token).await.unwrap());

    let mut identity = google_identity("google-sub-3", "victim@example.com");
    identity.email_verified = false;
    let resolved = db.find_or_create_federated_user(&identity).await.unwrap();
    assert_eq!(resolved, FederatedMatch::PasswordSignInRequired);

    let profile = db.user_profile(victim).await.unwrap().unwrap();
    assert_eq!(profile.providers, vec![PASSWORD_PROVIDER.to_string()]);
}

#[tokio::test]
async fn unverified_password_account_is_not_linked_to_google() {
    let db = create_test_db().await;
    let (squatter, _) = db
        .create_user("owner@example.com", "squatter-password", "Squatter")
        .await
        .unwrap();

    let resolved = db
        .find_or_create_federated_user(&google_identity("google-sub-4", "owner@example.com"))
        .await
        .unwrap();
    assert_eq!(resolved, FederatedMatch::PasswordSignInRequired);

    let profile = db.user_profile(squatter).await.unwrap().unwrap();
    assert!(!profile.email_verified);
    assert_eq!(profile.providers, vec![PASSWORD_PROVIDER.to_string()]);
}

#[tokio::test]
async fn emails_are_matched_case_insensitively() {
    let db = create_test_db().await;
    db.create_user("Arjuna@Example.com", "secret-password", "Arjuna")
        .await
        .unwrap();

    assert!(db.email_exists("arjuna@example.com").await.unwrap());
    assert!(db.verify_user_password("ARJUNA@example.com", "secret-password").await.unwrap());
    let user = db.find_user_by_email("arjuna@EXAMPLE.com").await.unwrap().unwrap();
    assert_eq!(user.email, "arjuna@example.com");
    assert!(db
        .create_user("arjuna@example.com", "other-password", "Arjuna 2")
        .await
        .is_err());
}
