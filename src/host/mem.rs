//! In-memory host graph
//!
//! A self-contained `HostGraph` for the test suite and for headless runs
//! outside the host application. Nodes keep insertion order so traversal
//! is deterministic. Built on `RefCell`, which also keeps it out of
//! multi-threaded use; the whole crate is single-threaded by design.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::model::NodeId;
use crate::host::graph::{HostError, HostGraph};

#[derive(Debug, Clone)]
struct MemNode {
    id: NodeId,
    name: String,
    node_type: String,
    parms: HashMap<String, String>,
}

/// In-memory node graph with selection tracking
#[derive(Debug, Default)]
pub struct MemGraph {
    nodes: RefCell<Vec<MemNode>>,
    selected: RefCell<Vec<NodeId>>,
}

impl MemGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph, returning its id for convenience
    pub fn add_node(
        &self,
        id: impl Into<NodeId>,
        name: impl Into<String>,
        node_type: impl Into<String>,
    ) -> NodeId {
        let id = id.into();
        self.nodes.borrow_mut().push(MemNode {
            id: id.clone(),
            name: name.into(),
            node_type: node_type.into(),
            parms: HashMap::new(),
        });
        id
    }

    /// Define a string parameter on an existing node
    ///
    /// Parameters must be defined before `set_parm` will accept writes,
    /// matching hosts where the parameter set is fixed per node type.
    pub fn define_parm(
        &self,
        node: &NodeId,
        parm: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), HostError> {
        let mut nodes = self.nodes.borrow_mut();
        let entry = nodes
            .iter_mut()
            .find(|n| &n.id == node)
            .ok_or_else(|| HostError::NodeMissing(node.clone()))?;
        entry.parms.insert(parm.into(), value.into());
        Ok(())
    }

    /// Snapshot of the currently selected nodes
    pub fn selected(&self) -> Vec<NodeId> {
        self.selected.borrow().clone()
    }
}

impl HostGraph for MemGraph {
    fn nodes(&self) -> Result<Vec<NodeId>, HostError> {
        Ok(self.nodes.borrow().iter().map(|n| n.id.clone()).collect())
    }

    fn type_name(&self, node: &NodeId) -> Result<String, HostError> {
        let nodes = self.nodes.borrow();
        nodes
            .iter()
            .find(|n| &n.id == node)
            .map(|n| n.node_type.clone())
            .ok_or_else(|| HostError::NodeMissing(node.clone()))
    }

    fn node_name(&self, node: &NodeId) -> Result<String, HostError> {
        let nodes = self.nodes.borrow();
        nodes
            .iter()
            .find(|n| &n.id == node)
            .map(|n| n.name.clone())
            .ok_or_else(|| HostError::NodeMissing(node.clone()))
    }

    fn eval_parm(&self, node: &NodeId, parm: &str) -> Result<String, HostError> {
        let nodes = self.nodes.borrow();
        let entry = nodes
            .iter()
            .find(|n| &n.id == node)
            .ok_or_else(|| HostError::NodeMissing(node.clone()))?;
        entry
            .parms
            .get(parm)
            .cloned()
            .ok_or_else(|| HostError::ParmMissing {
                node: node.clone(),
                parm: parm.to_string(),
            })
    }

    fn set_parm(&self, node: &NodeId, parm: &str, value: &str) -> Result<(), HostError> {
        let mut nodes = self.nodes.borrow_mut();
        let entry = nodes
            .iter_mut()
            .find(|n| &n.id == node)
            .ok_or_else(|| HostError::NodeMissing(node.clone()))?;
        match entry.parms.get_mut(parm) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(HostError::ParmMissing {
                node: node.clone(),
                parm: parm.to_string(),
            }),
        }
    }

    fn set_selected(&self, node: &NodeId, exclusive: bool) -> Result<(), HostError> {
        if !self.nodes.borrow().iter().any(|n| &n.id == node) {
            return Err(HostError::NodeMissing(node.clone()));
        }
        let mut selected = self.selected.borrow_mut();
        if exclusive {
            selected.clear();
            selected.push(node.clone());
        } else if !selected.contains(node) {
            selected.push(node.clone());
        }
        Ok(())
    }
}
