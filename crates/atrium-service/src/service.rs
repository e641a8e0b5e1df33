//! # Customer Service
//!
//! The operations a transport layer calls: list, get, create, update,
//! delete.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     create(payload)                                     │
//! │                                                                         │
//! │  async caller                                                           │
//! │       │                                                                 │
//! │       ▼  spawn_blocking (runs to completion even if the caller          │
//! │       │                  drops its future)                              │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │ 1. normalize + apply defaults        (Customer::from_payload)  │    │
//! │  │ 2. field rules                       (validate_customer)       │    │
//! │  │ 3. ── RecordStore::with_lock ─────────────────────────────┐    │    │
//! │  │    │ email already used?      → Conflict                   │    │    │
//! │  │    │ client id already used?  → Conflict                   │    │    │
//! │  │    │ generated id collides?   → generate again             │    │    │
//! │  │    │ append, save atomically, publish                      │    │    │
//! │  │    └───────────────────────────────────────────────────────┘    │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads (`list`, `get`, `count`) work on a snapshot and never wait for a
//! save in progress.

use std::sync::Arc;

use atrium_core::validation::validate_customer;
use atrium_core::{
    ClockIdGenerator, Customer, CustomerDefaults, CustomerPayload, IdGenerator, ListQuery, Page,
};
use atrium_store::{Mutation, RecordStore};
use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// Fresh ids tried inside the critical section before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// Customer operations over one [`RecordStore`].
///
/// Cloning is cheap and every clone shares the same store.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<RecordStore>,
    defaults: CustomerDefaults,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for CustomerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerService")
            .field("store", &self.store)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl CustomerService {
    /// Creates a service over an open store.
    pub fn new(store: RecordStore, defaults: CustomerDefaults) -> Self {
        CustomerService {
            store: Arc::new(store),
            defaults,
            ids: Arc::new(ClockIdGenerator),
        }
    }

    /// Opens the store named by `config` and wraps it.
    pub fn open(config: &ServiceConfig) -> ServiceResult<Self> {
        let store = RecordStore::open(config.store_config())?;
        Ok(Self::new(store, config.defaults.clone()))
    }

    /// Replaces the id generator.
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Releases the store once no other clone of this service is alive.
    pub fn close(self) {
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.close(),
            Err(_) => debug!("Store still shared; it closes with the last clone"),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Filters, searches and paginates the collection.
    pub async fn list(&self, query: ListQuery) -> ServiceResult<Page<Customer>> {
        let snapshot = self.store.snapshot();
        Ok(query.run(&snapshot))
    }

    /// Looks up one customer.
    pub async fn get(&self, id: &str) -> ServiceResult<Customer> {
        self.store
            .snapshot()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Number of customers.
    pub async fn count(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the data file is readable and parses.
    pub async fn health_check(&self) -> bool {
        self.blocking("health_check", |store| Ok(store.health_check()))
            .await
            .unwrap_or(false)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a customer.
    ///
    /// ## Errors
    /// - `Validation` - field rules failed (all violations listed)
    /// - `Conflict` - email, or the client-supplied id, is taken
    /// - `Persistence` - the save failed; nothing was added
    pub async fn create(&self, payload: CustomerPayload) -> ServiceResult<Customer> {
        let defaults = self.defaults.clone();
        let ids = Arc::clone(&self.ids);

        let customer = self
            .blocking("create", move |store| {
                create_in(store, ids.as_ref(), &defaults, payload)
            })
            .await?;

        info!(id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Shallow-merges `payload` into the customer with `id`.
    ///
    /// ## Errors
    /// - `NotFound` - no customer has this id
    /// - `Validation` - the merged record breaks a field rule
    /// - `Conflict` - the email changed to one another customer uses
    /// - `Persistence` - the save failed; the record is unchanged
    pub async fn update(&self, id: &str, payload: CustomerPayload) -> ServiceResult<Customer> {
        let id = id.to_string();

        let customer = self
            .blocking("update", move |store| update_in(store, &id, payload))
            .await?;

        info!(id = %customer.id, "Customer updated");
        Ok(customer)
    }

    /// Deletes the customer with `id`.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let owned = id.to_string();
        self.blocking("delete", move |store| delete_in(store, &owned))
            .await?;

        info!(id = %id, "Customer deleted");
        Ok(())
    }

    /// Runs `f` on the blocking pool.
    ///
    /// A started store call always finishes, so dropping the returned
    /// future never leaves a write half done.
    async fn blocking<T, F>(&self, operation: &'static str, f: F) -> ServiceResult<T>
    where
        F: FnOnce(&RecordStore) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);

        let result = tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| {
                error!(operation, error = %e, "Store task did not complete");
                ServiceError::Internal(format!("{} did not complete", operation))
            })?;

        match &result {
            Err(ServiceError::Persistence(e)) => {
                error!(operation, error = %e, "Persistence failure")
            }
            Err(e) => debug!(operation, error = %e, "Operation rejected"),
            Ok(_) => {}
        }

        result
    }
}

// =============================================================================
// Critical-Section Bodies
// =============================================================================

fn create_in(
    store: &RecordStore,
    ids: &dyn IdGenerator,
    defaults: &CustomerDefaults,
    mut payload: CustomerPayload,
) -> ServiceResult<Customer> {
    let requested_id = payload
        .id
        .take()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let candidate_id = requested_id.clone().unwrap_or_else(|| ids.generate());
    let mut customer = Customer::from_payload(candidate_id, payload, defaults, Utc::now());
    validate_customer(&customer)?;

    store.with_lock(|current| -> ServiceResult<Mutation<Customer>> {
        if email_taken(current, &customer.email, None) {
            return Err(ServiceError::conflict("email", customer.email.clone()));
        }

        if requested_id.is_some() {
            if id_taken(current, &customer.id) {
                return Err(ServiceError::conflict("id", customer.id.clone()));
            }
        } else {
            customer.id = unique_id(current, ids, customer.id.clone())?;
        }

        let mut next = current.to_vec();
        next.push(customer.clone());
        Ok(Mutation::Commit(next, customer))
    })
}

fn update_in(store: &RecordStore, id: &str, payload: CustomerPayload) -> ServiceResult<Customer> {
    store.with_lock(|current| -> ServiceResult<Mutation<Customer>> {
        let index = position(current, id)?;
        let mut customer = current[index].clone();

        let email_changed = payload.changes_email(&customer.email);
        customer.merge(payload, Utc::now());
        validate_customer(&customer)?;

        if email_changed && email_taken(current, &customer.email, Some(id)) {
            return Err(ServiceError::conflict("email", customer.email.clone()));
        }

        let mut next = current.to_vec();
        next[index] = customer.clone();
        Ok(Mutation::Commit(next, customer))
    })
}

fn delete_in(store: &RecordStore, id: &str) -> ServiceResult<()> {
    store.with_lock(|current| -> ServiceResult<Mutation<()>> {
        let index = position(current, id)?;

        let mut next = current.to_vec();
        next.remove(index);
        Ok(Mutation::Commit(next, ()))
    })
}

fn position(customers: &[Customer], id: &str) -> ServiceResult<usize> {
    customers
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| ServiceError::NotFound(id.to_string()))
}

fn id_taken(customers: &[Customer], id: &str) -> bool {
    customers.iter().any(|c| c.id == id)
}

/// Case-insensitive email lookup, ignoring the record `except`.
fn email_taken(customers: &[Customer], email: &str, except: Option<&str>) -> bool {
    customers
        .iter()
        .filter(|c| Some(c.id.as_str()) != except)
        .any(|c| c.email.to_lowercase() == email)
}

/// Keeps generating until the id is free in `customers`.
fn unique_id(
    customers: &[Customer],
    ids: &dyn IdGenerator,
    first: String,
) -> ServiceResult<String> {
    let mut id = first;

    for attempt in 1..=MAX_ID_ATTEMPTS {
        if !id_taken(customers, &id) {
            return Ok(id);
        }
        warn!(id = %id, attempt, "Generated id already in use, regenerating");
        id = ids.generate();
    }

    Err(ServiceError::Internal(format!(
        "no free customer id after {} attempts",
        MAX_ID_ATTEMPTS
    )))
}

// =============================================================================
// Unit Tests
// =============================================================================
