use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    Error,
    store::{Document, DocumentBody, DocumentStore, Filter},
};

/// An in-memory document store that counts calls and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct FakeStore {
    documents: Mutex<Vec<(String, Document)>>,
    calls: AtomicUsize,
    failure: Mutex<Option<String>>,
}

impl FakeStore {
    /// The number of store operations that have been called.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every following operation fail with `message`.
    pub(crate) fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_owned());
    }

    fn begin_call(&self) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(Error::RemoteFailure(message.clone())),
            None => Ok(()),
        }
    }
}

impl DocumentStore for FakeStore {
    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, Error> {
        self.begin_call()?;

        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(stored_collection, document)| {
                stored_collection == collection
                    && filters.iter().all(|filter| filter.matches(&document.body))
            })
            .map(|(_, document)| document.clone())
            .collect())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, Error> {
        self.begin_call()?;

        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|(stored_collection, document)| {
                stored_collection == collection && document.id == id
            })
            .map(|(_, document)| document.clone()))
    }

    fn set(&self, collection: &str, id: &str, body: &DocumentBody) -> Result<(), Error> {
        self.begin_call()?;

        let mut documents = self.documents.lock().unwrap();
        let document = Document {
            id: id.to_owned(),
            body: body.clone(),
        };

        match documents
            .iter_mut()
            .find(|(stored_collection, stored)| stored_collection == collection && stored.id == id)
        {
            Some((_, stored)) => *stored = document,
            None => documents.push((collection.to_owned(), document)),
        }

        Ok(())
    }

    fn delete(&self, collection: &str, id: &str) -> Result<(), Error> {
        self.begin_call()?;

        self.documents
            .lock()
            .unwrap()
            .retain(|(stored_collection, document)| {
                !(stored_collection == collection && document.id == id)
            });

        Ok(())
    }
}
