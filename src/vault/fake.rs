//! In-memory `LogicalClient` for adapter tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Data, LogicalClient, Secret, VaultError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Read(String),
    Write(String, Data),
    Delete(String),
}

#[derive(Default)]
pub(crate) struct FakeVault {
    objects: Mutex<BTreeMap<String, Data>>,
    write_replies: Mutex<BTreeMap<String, Option<Data>>>,
    failures: Mutex<BTreeMap<String, u16>>,
    calls: Mutex<Vec<Call>>,
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

impl FakeVault {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&self, path: &str, data: Value) {
        let data = data.as_object().cloned().expect("object");
        self.objects.lock().unwrap().insert(normalize(path), data);
    }

    pub(crate) fn get(&self, path: &str) -> Option<Data> {
        self.objects.lock().unwrap().get(&normalize(path)).cloned()
    }

    /// Writes to `path` answer with `reply` instead of storing the body.
    pub(crate) fn reply_to_write(&self, path: &str, reply: Option<Value>) {
        let reply = reply.map(|v| v.as_object().cloned().expect("object"));
        self.write_replies
            .lock()
            .unwrap()
            .insert(normalize(path), reply);
    }

    pub(crate) fn fail(&self, path: &str, status: u16) {
        self.failures.lock().unwrap().insert(normalize(path), status);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn writes(&self) -> Vec<(String, Data)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Write(path, data) => Some((path, data)),
                _ => None,
            })
            .collect()
    }

    fn check(&self, path: &str) -> Result<(), VaultError> {
        match self.failures.lock().unwrap().get(path) {
            Some(&status) => Err(VaultError::Api {
                status,
                message: format!("injected failure for {}", path),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LogicalClient for FakeVault {
    async fn read(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        let path = normalize(path);
        self.calls.lock().unwrap().push(Call::Read(path.clone()));
        self.check(&path)?;
        Ok(self.get(&path).map(Secret::from_data))
    }

    async fn write(&self, path: &str, data: Data) -> Result<Option<Secret>, VaultError> {
        let path = normalize(path);
        self.calls
            .lock()
            .unwrap()
            .push(Call::Write(path.clone(), data.clone()));
        self.check(&path)?;

        if let Some(reply) = self.write_replies.lock().unwrap().get(&path) {
            return Ok(reply.clone().map(Secret::from_data));
        }
        self.objects.lock().unwrap().insert(path, data);
        Ok(None)
    }

    async fn delete(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        let path = normalize(path);
        self.calls.lock().unwrap().push(Call::Delete(path.clone()));
        self.check(&path)?;
        self.objects.lock().unwrap().remove(&path);
        Ok(None)
    }
}
