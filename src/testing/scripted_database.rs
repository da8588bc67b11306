use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::QueryRows;
use crate::ports::{Database, DatabaseError};

/// Connection handle that counts releases on drop.
pub struct FakeConnection {
    released: Arc<Mutex<usize>>,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        *self.released.lock().unwrap() += 1;
    }
}

/// Database fake that replays scripted results and records executed queries.
#[derive(Clone, Default)]
pub struct ScriptedDatabase {
    results: Arc<Mutex<VecDeque<Result<QueryRows, DatabaseError>>>>,
    queries: Arc<Mutex<Vec<String>>>,
    opened: Arc<Mutex<usize>>,
    released: Arc<Mutex<usize>>,
    refuse_connections: bool,
}

impl ScriptedDatabase {
    pub fn new(results: Vec<Result<QueryRows, DatabaseError>>) -> Self {
        Self { results: Arc::new(Mutex::new(results.into())), ..Default::default() }
    }

    pub fn unreachable() -> Self {
        Self { refuse_connections: true, ..Default::default() }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn connections_opened(&self) -> usize {
        *self.opened.lock().unwrap()
    }

    pub fn connections_released(&self) -> usize {
        *self.released.lock().unwrap()
    }
}

impl Database for ScriptedDatabase {
    type Connection = FakeConnection;

    fn connect(&self) -> Result<FakeConnection, DatabaseError> {
        if self.refuse_connections {
            return Err(DatabaseError::Connect("connection refused".to_string()));
        }
        *self.opened.lock().unwrap() += 1;
        Ok(FakeConnection { released: Arc::clone(&self.released) })
    }

    fn execute(
        &self,
        _connection: &mut FakeConnection,
        query: &str,
    ) -> Result<QueryRows, DatabaseError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.lock().unwrap().pop_front().unwrap_or_else(|| Ok(QueryRows::default()))
    }
}
