mod common;

use common::TestContext;
use predicates::prelude::*;
use serde_json::Value;

const INITIAL: &str = "User Query";
const REFINEMENT: &str = "Previous SQL Query";

#[test]
fn generate_prints_normalized_query() {
    let mut ctx = TestContext::new();
    let initial = ctx.mock_reply(INITIAL, "```sql\nSELECT id, name FROM users LIMIT 100\n```", 1);

    ctx.cli()
        .args(["generate", "list users"])
        .assert()
        .success()
        .stdout("SELECT id, name FROM users LIMIT 100\n");

    initial.assert();
}

#[test]
fn generate_fails_when_model_reports_an_error() {
    let mut ctx = TestContext::new();
    let initial = ctx.mock_reply(INITIAL, "Error: the schema has no orders table", 1);

    ctx.cli()
        .args(["generate", "list orders"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Error: Model reported a problem"));

    initial.assert();
}

#[test]
fn ask_with_execution_needs_a_database_before_calling_the_model() {
    let mut ctx = TestContext::new();
    let initial = ctx.mock_reply(INITIAL, "SELECT id FROM users", 0);

    ctx.cli()
        .args(["ask", "-x", "list users"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: No database configured"));

    initial.assert();
}

#[test]
fn ask_generates_then_refines() {
    let mut ctx = TestContext::new();
    let initial = ctx.mock_reply(INITIAL, "SELECT id FROM users WHERE country = 'India'", 1);
    let refined = ctx.mock_reply(
        REFINEMENT,
        "```sql\nSELECT id FROM users WHERE country = 'India' LIMIT 100\n```",
        1,
    );

    ctx.cli()
        .args(["ask", "Show me users from India"])
        .assert()
        .success()
        .stdout("SELECT id FROM users WHERE country = 'India' LIMIT 100\n")
        .stderr(predicate::str::contains("Query confirmed after 1 round(s)"));

    initial.assert();
    refined.assert();
}

#[test]
fn ask_exits_with_2_when_budget_runs_out() {
    let mut ctx = TestContext::new();
    let _initial = ctx.mock_reply(INITIAL, "SELECT nme FROM users", 1);
    let refined = ctx.mock_reply(REFINEMENT, "Error: column nme does not exist", 5);

    ctx.cli()
        .args(["ask", "user names"])
        .assert()
        .code(2)
        .stdout("Error: column nme does not exist\n")
        .stderr(predicate::str::contains("not confirmed after 5 round(s)"));

    refined.assert();
}

#[test]
fn ask_executes_and_refines_on_database_errors() {
    let mut ctx = TestContext::new();
    ctx.create_database("app.sqlite");
    let _initial = ctx.mock_reply(INITIAL, "SELECT name FROM customers", 1);
    let first =
        ctx.mock_reply("Query:.{0,4}SELECT name FROM customers", "SELECT nme FROM users", 1);
    let second = ctx.mock_reply(
        "Query:.{0,4}SELECT nme FROM users",
        "SELECT name FROM users ORDER BY id",
        1,
    );

    ctx.cli()
        .args(["ask", "user names", "--execute", "--database", "app.sqlite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SELECT name FROM users ORDER BY id"))
        .stdout(predicate::str::contains("name\nAsha\nLena\n"))
        .stderr(predicate::str::contains("Query confirmed after 2 round(s)"));

    first.assert();
    second.assert();
}

#[test]
fn ask_uses_answer_for_clarification() {
    let mut ctx = TestContext::new();
    let question = ctx.mock_reply("User Query(.)*recent users", "Which time range do you mean?", 1);
    let clarified =
        ctx.mock_reply("Additional User Details: the last 7 days", "SELECT id FROM users", 1);
    let _refined = ctx.mock_reply(REFINEMENT, "SELECT id FROM users LIMIT 100", 1);

    ctx.cli()
        .args(["ask", "recent users", "--answer", "the last 7 days"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Which time range do you mean?"))
        .stdout(predicate::str::contains("SELECT id FROM users LIMIT 100"));

    clarified.assert();
    question.assert();
}

#[test]
fn session_file_records_last_query_for_refine() {
    let mut ctx = TestContext::new();
    let _initial = ctx.mock_reply(INITIAL, "SELECT id FROM users", 1);
    let _refined = ctx.mock_reply(
        "Query:.{0,4}SELECT id FROM users.{0,8}Instructions",
        "SELECT id FROM users LIMIT 100",
        1,
    );

    ctx.cli()
        .args(["ask", "user ids", "--session", "session.json"])
        .assert()
        .success();

    let session: Value = serde_json::from_str(&ctx.read_file("session.json")).unwrap();
    assert_eq!(session["last_query"], "SELECT id FROM users LIMIT 100");
    assert_eq!(session["last_question"], "user ids");
    assert_eq!(session["exchanges"][0]["status"], "succeeded");

    let follow_up = ctx.mock_reply(
        "Additional Requirement:.{0,4}order by id",
        "SELECT id FROM users ORDER BY id LIMIT 100",
        1,
    );

    ctx.cli()
        .args(["refine", "--requirement", "order by id", "--session", "session.json"])
        .assert()
        .success()
        .stdout("SELECT id FROM users ORDER BY id LIMIT 100\n");

    follow_up.assert();
    let session: Value = serde_json::from_str(&ctx.read_file("session.json")).unwrap();
    assert_eq!(session["last_query"], "SELECT id FROM users ORDER BY id LIMIT 100");
    assert_eq!(session["exchanges"].as_array().unwrap().len(), 2);
}

#[test]
fn refine_without_query_or_session_fails() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["refine"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No query given"));
}

#[test]
fn service_outage_aborts_refinement() {
    let mut ctx = TestContext::new();
    let _outage = ctx.mock_status(503);

    ctx.cli()
        .args(["refine", "SELECT id FROM users"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Refinement stopped after 1 round(s)"));
}

#[test]
fn missing_api_key_is_reported() {
    let ctx = TestContext::new();

    ctx.cli()
        .env_remove("GOOGLE_API_KEY")
        .args(["generate", "list users"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_API_KEY environment variable not set"));
}
