#![allow(dead_code)]
use log::LevelFilter;
use quarry::{
    Connection, Driver, Executor, GenericSqlWriter, QueryResult, Result, RowLabeled, RowNames,
    RowsAffected, Value,
    stream::{self, Stream},
};
use std::{
    borrow::Cow,
    collections::VecDeque,
    env,
    sync::Mutex,
};

/// Every url passed to `RecordingConnection::connect` and `disconnect`, in order.
pub static CONNECTS: Mutex<Vec<String>> = Mutex::new(Vec::new());
pub static DISCONNECTS: Mutex<Vec<String>> = Mutex::new(Vec::new());

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub fn count(list: &Mutex<Vec<String>>, url: &str) -> usize {
    list.lock().unwrap().iter().filter(|v| *v == url).count()
}

#[derive(Default, Clone, Copy)]
pub struct RecordingDriver;

impl Driver for RecordingDriver {
    type Connection = RecordingConnection;
    type SqlWriter = GenericSqlWriter;

    const NAME: &'static str = "recording";
    fn sql_writer(&self) -> GenericSqlWriter {
        GenericSqlWriter::new()
    }
}

/// In memory connection keeping the statements it receives.
///
/// Each statement consumes the next canned result, an empty `Affected` is returned when no
/// result is queued.
#[derive(Default)]
pub struct RecordingConnection {
    pub url: String,
    pub statements: Vec<String>,
    pub results: VecDeque<Vec<QueryResult>>,
}

impl RecordingConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result set with the given column labels.
    pub fn push_rows(&mut self, labels: &[&str], rows: Vec<Vec<Value>>) {
        let labels: RowNames = labels.iter().map(|v| v.to_string()).collect();
        self.results.push_back(
            rows.into_iter()
                .map(|v| RowLabeled::new(labels.clone(), v.into_boxed_slice()).into())
                .collect(),
        );
    }

    pub fn push_affected(&mut self, rows_affected: u64) {
        self.results.push_back(vec![
            RowsAffected {
                rows_affected,
                last_affected_id: None,
            }
            .into(),
        ]);
    }
}

impl Executor for RecordingConnection {
    type Driver = RecordingDriver;

    fn driver(&self) -> &Self::Driver {
        &RecordingDriver {}
    }

    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.statements.push(query);
        let results = self
            .results
            .pop_front()
            .unwrap_or_else(|| vec![RowsAffected::default().into()]);
        stream::iter(results.into_iter().map(Ok))
    }
}

impl Connection for RecordingConnection {
    async fn connect(url: Cow<'static, str>) -> Result<Self> {
        CONNECTS.lock().unwrap().push(url.to_string());
        Ok(Self {
            url: url.into_owned(),
            ..Default::default()
        })
    }

    async fn disconnect(self) -> Result<()> {
        DISCONNECTS.lock().unwrap().push(self.url);
        Ok(())
    }
}
