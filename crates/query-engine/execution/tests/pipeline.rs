use std::collections::VecDeque;

use async_trait::async_trait;
use query_engine_execution::database::{Database, Row};
use query_engine_execution::error::{DatabaseError, DatabaseErrorKind};
use query_engine_execution::metrics::Metrics;
use query_engine_execution::{query, shape};
use query_engine_sql::sql::string::SQL;
use query_engine_translation::translation::query::{compile, translate, Options};
use serde_json::{json, Value};
use tokio::time::{Duration, Instant};

/// Answers statements from a script and remembers what it was asked.
#[derive(Default)]
struct ScriptedDatabase {
    responses: VecDeque<Result<Vec<Row>, DatabaseError>>,
    executed: Vec<SQL>,
}

impl ScriptedDatabase {
    fn respond(mut self, rows: Value) -> Self {
        let Value::Array(rows) = rows else {
            panic!("expected an array of rows");
        };
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                _ => panic!("rows are objects"),
            })
            .collect();
        self.responses.push_back(Ok(rows));
        self
    }

    fn fail(mut self, kind: DatabaseErrorKind) -> Self {
        self.responses
            .push_back(Err(DatabaseError::new(kind, "scripted failure")));
        self
    }
}

#[async_trait]
impl Database for ScriptedDatabase {
    async fn execute(
        &mut self,
        statement: &SQL,
        _deadline: Instant,
    ) -> Result<Vec<Row>, DatabaseError> {
        self.executed.push(statement.clone());
        self.responses
            .pop_front()
            .expect("no scripted response left")
    }
}

fn metrics() -> Metrics {
    Metrics::initialize(&mut prometheus::Registry::new()).unwrap()
}

fn deadline() -> Instant {
    Instant::now() + Duration::from_secs(5)
}

async fn run(database: &mut ScriptedDatabase, raw_query: &str) -> Result<Value, DatabaseError> {
    let plan = translate(raw_query, &Options::default()).unwrap();
    let execution_plan = compile(&plan);
    let results = query::execute(database, &metrics(), &execution_plan, deadline()).await?;
    Ok(shape::shape(&results, &plan))
}

#[tokio::test]
async fn count_alone_runs_only_the_count_statement() {
    let mut database = ScriptedDatabase::default().respond(json!([{"count": 4}]));

    let payload = run(&mut database, "$count&$filter=(sku eq '12345678')")
        .await
        .unwrap();

    assert_eq!(payload, json!({"count": 4}));
    assert_eq!(database.executed.len(), 1);
    assert!(database.executed[0].sql.starts_with("SELECT COUNT(*)"));
}

#[tokio::test]
async fn inline_count_runs_count_then_rows() {
    let mut database = ScriptedDatabase::default()
        .respond(json!([{"count": 25}]))
        .respond(json!([
            {"sku": "a", "productList.productId": "p1"},
            {"sku": "a", "productList.productId": "p2"}
        ]));

    let payload = run(
        &mut database,
        "$select=sku,productList.productId&$top=2&$inlinecount=allpages",
    )
    .await
    .unwrap();

    assert_eq!(
        payload,
        json!({
            "results": [
                {"sku": "a", "productList": [{"productId": "p1"}, {"productId": "p2"}]}
            ],
            "count": 25
        })
    );
    assert_eq!(database.executed.len(), 2);
    assert!(database.executed[0].sql.starts_with("SELECT COUNT(*)"));
    assert!(database.executed[1].sql.ends_with("LIMIT 2"));
}

#[tokio::test]
async fn rows_without_a_count() {
    let mut database = ScriptedDatabase::default().respond(json!([]));

    let payload = run(&mut database, "$filter=startswith(sku,'m')").await.unwrap();

    assert_eq!(payload, json!({"results": []}));
    assert_eq!(database.executed.len(), 1);
}

#[tokio::test]
async fn database_errors_stop_the_pipeline() {
    let mut database = ScriptedDatabase::default().fail(DatabaseErrorKind::ConnectionLost);

    let error = run(&mut database, "$inlinecount=allpages").await.unwrap_err();

    assert_eq!(error.kind, DatabaseErrorKind::ConnectionLost);
    // the data statement never ran
    assert_eq!(database.executed.len(), 1);
}

#[tokio::test]
async fn a_count_statement_without_a_count_is_an_error() {
    let mut database = ScriptedDatabase::default().respond(json!([]));

    let error = run(&mut database, "$count").await.unwrap_err();

    assert_eq!(error.kind, DatabaseErrorKind::Unknown);
}

#[tokio::test]
async fn failures_are_counted_by_kind() {
    let metrics = metrics();
    let mut database = ScriptedDatabase::default().fail(DatabaseErrorKind::Timeout);
    let plan = compile(&translate("", &Options::default()).unwrap());

    let result = query::execute(&mut database, &metrics, &plan, deadline()).await;

    assert!(result.is_err());
    assert_eq!(
        metrics.query_errors.with_label_values(&["timeout"]).get(),
        1
    );
    assert_eq!(metrics.query_total.get(), 0);
}
