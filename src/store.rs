//! The contract of the remote flow-storage collaborator.
//!
//! The engine performs no I/O; hosts plug a [`FlowStore`] implementation in.
//! [`MemoryFlowStore`] keeps everything in process and backs the tests and the CLI.

use crate::error::StoreError;
use crate::ids;
use crate::interpreter;
use crate::model::Definition;
use crate::normalizer::canonicalize;
use crate::validator::prepare_for_publish;
use ahash::AHashMap;
use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A stored flow as the collaborator reports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowRecord {
    pub id: String,
    pub domain: String,
    pub name: String,
    /// Latest saved version number (1-based).
    pub version: u32,
    pub published_version: Option<u32>,
    pub archived: bool,
    pub definition: Definition,
}

/// A literal user input run against a definition and the prior conversation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRequest {
    pub definition: Definition,
    pub input: String,
    pub state: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewReply {
    pub message: String,
    pub state: Value,
}

/// Opaque storage and preview operations. Every failure is a [`StoreError`];
/// the engine never retries or inspects transport details.
pub trait FlowStore {
    fn list_by_domain(&self, domain: &str) -> Result<Vec<FlowRecord>, StoreError>;
    fn get(&self, id: &str) -> Result<FlowRecord, StoreError>;
    fn get_published(&self, id: &str) -> Result<FlowRecord, StoreError>;
    fn create(
        &mut self,
        domain: &str,
        name: &str,
        definition: Definition,
    ) -> Result<FlowRecord, StoreError>;
    /// Saves `definition` as a new version and publishes it.
    fn publish(&mut self, id: &str, definition: Definition) -> Result<FlowRecord, StoreError>;
    /// Re-publishes an existing version.
    fn publish_version(&mut self, id: &str, version: u32) -> Result<FlowRecord, StoreError>;
    fn clone_flow(&mut self, id: &str, name: &str) -> Result<FlowRecord, StoreError>;
    fn archive(&mut self, id: &str) -> Result<FlowRecord, StoreError>;
    fn unarchive(&mut self, id: &str) -> Result<FlowRecord, StoreError>;
    fn create_from_template(
        &mut self,
        domain: &str,
        name: &str,
        template: &str,
    ) -> Result<FlowRecord, StoreError>;
    fn preview(&self, request: &PreviewRequest) -> Result<PreviewReply, StoreError>;
}

/// Re-normalizes and re-validates `definition`, then publishes it.
pub fn publish_checked<S: FlowStore + ?Sized>(
    store: &mut S,
    id: &str,
    definition: &Definition,
) -> Result<FlowRecord, StoreError> {
    let canonical = prepare_for_publish(definition).map_err(StoreError::Invalid)?;
    store.publish(id, canonical)
}

#[derive(Debug, Clone)]
struct StoredFlow {
    domain: String,
    name: String,
    versions: Vec<Definition>,
    published: Option<u32>,
    archived: bool,
}

impl StoredFlow {
    fn record(&self, id: &str, version: u32) -> Option<FlowRecord> {
        let definition = self.versions.get(version.checked_sub(1)? as usize)?.clone();
        Some(FlowRecord {
            id: id.to_string(),
            domain: self.domain.clone(),
            name: self.name.clone(),
            version: self.versions.len() as u32,
            published_version: self.published,
            archived: self.archived,
            definition,
        })
    }

    fn latest(&self, id: &str) -> Option<FlowRecord> {
        self.record(id, self.versions.len() as u32)
    }
}

/// An in-process [`FlowStore`]. Preview is unsupported: running a flow is the
/// external runtime's job.
///
/// Every stored version is canonicalized on the way in. Validation is not
/// applied here; use [`publish_checked`] to reject invalid definitions.
#[derive(Debug, Clone)]
pub struct MemoryFlowStore {
    flows: AHashMap<String, StoredFlow>,
    templates: AHashMap<String, Definition>,
}

impl Default for MemoryFlowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFlowStore {
    /// A store with the starter flow registered as template `basico`.
    pub fn new() -> Self {
        let mut store = Self {
            flows: AHashMap::new(),
            templates: AHashMap::new(),
        };
        if let Ok(starter) = interpreter::interpret(&Definition::empty(), "criar fluxo básico") {
            store.templates.insert("basico".to_string(), starter.definition);
        }
        store
    }

    pub fn with_template(mut self, name: &str, definition: Definition) -> Self {
        self.templates.insert(name.to_string(), definition);
        self
    }

    fn flow(&self, id: &str) -> Result<&StoredFlow, StoreError> {
        self.flows
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn flow_mut(&mut self, id: &str) -> Result<&mut StoredFlow, StoreError> {
        self.flows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn latest(&self, id: &str) -> Result<FlowRecord, StoreError> {
        self.flow(id)?
            .latest(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn insert(&mut self, domain: &str, name: &str, definition: Definition) -> FlowRecord {
        let definition = canonicalize(definition);
        let id = ids::sequential_key("flow", self.flows.keys().map(String::as_str));
        debug!(%id, domain, name, "store: create");
        let stored = StoredFlow {
            domain: domain.to_string(),
            name: name.to_string(),
            versions: vec![definition.clone()],
            published: None,
            archived: false,
        };
        self.flows.insert(id.clone(), stored);
        FlowRecord {
            id,
            domain: domain.to_string(),
            name: name.to_string(),
            version: 1,
            published_version: None,
            archived: false,
            definition,
        }
    }

    fn set_archived(&mut self, id: &str, archived: bool) -> Result<FlowRecord, StoreError> {
        self.flow_mut(id)?.archived = archived;
        debug!(id, archived, "store: archive flag changed");
        self.latest(id)
    }
}

impl FlowStore for MemoryFlowStore {
    fn list_by_domain(&self, domain: &str) -> Result<Vec<FlowRecord>, StoreError> {
        Ok(self
            .flows
            .iter()
            .filter(|(_, flow)| flow.domain == domain)
            .filter_map(|(id, flow)| flow.latest(id))
            .sorted_by(|a, b| a.id.cmp(&b.id))
            .collect())
    }

    fn get(&self, id: &str) -> Result<FlowRecord, StoreError> {
        self.latest(id)
    }

    fn get_published(&self, id: &str) -> Result<FlowRecord, StoreError> {
        let flow = self.flow(id)?;
        flow.published
            .and_then(|version| flow.record(id, version))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn create(
        &mut self,
        domain: &str,
        name: &str,
        definition: Definition,
    ) -> Result<FlowRecord, StoreError> {
        Ok(self.insert(domain, name, definition))
    }

    fn publish(&mut self, id: &str, definition: Definition) -> Result<FlowRecord, StoreError> {
        let flow = self.flow_mut(id)?;
        flow.versions.push(canonicalize(definition));
        let version = flow.versions.len() as u32;
        flow.published = Some(version);
        debug!(id, version, "store: publish");
        self.latest(id)
    }

    fn publish_version(&mut self, id: &str, version: u32) -> Result<FlowRecord, StoreError> {
        let flow = self.flow_mut(id)?;
        if version == 0 || version as usize > flow.versions.len() {
            return Err(StoreError::VersionNotFound {
                id: id.to_string(),
                version,
            });
        }
        flow.published = Some(version);
        debug!(id, version, "store: publish existing version");
        self.latest(id)
    }

    fn clone_flow(&mut self, id: &str, name: &str) -> Result<FlowRecord, StoreError> {
        let source = self.latest(id)?;
        Ok(self.insert(&source.domain, name, source.definition))
    }

    fn archive(&mut self, id: &str) -> Result<FlowRecord, StoreError> {
        self.set_archived(id, true)
    }

    fn unarchive(&mut self, id: &str) -> Result<FlowRecord, StoreError> {
        self.set_archived(id, false)
    }

    fn create_from_template(
        &mut self,
        domain: &str,
        name: &str,
        template: &str,
    ) -> Result<FlowRecord, StoreError> {
        let definition = self
            .templates
            .get(template)
            .cloned()
            .ok_or_else(|| StoreError::TemplateNotFound(template.to_string()))?;
        Ok(self.insert(domain, name, definition))
    }

    fn preview(&self, _request: &PreviewRequest) -> Result<PreviewReply, StoreError> {
        Err(StoreError::Remote(
            "preview is not available without the flow runtime".to_string(),
        ))
    }
}
