//! Graph construction from data.

use crate::graph::ObservableGraph;
use crate::node::{NodeId, NodeSource};
use alloc::string::String;
use tracing::debug;
use weft_core::{Path, Result, Value};

/// Walks data trees into an `ObservableGraph`.
///
/// Every member of an object or array gets one node parented to the node of
/// its container; containers are walked recursively. Members that already
/// have a node keep it, so passing a grown value through the builder again
/// only adds nodes for the new members.
pub struct GraphBuilder<'a, C> {
    graph: &'a mut ObservableGraph<C>,
}

impl<'a, C> GraphBuilder<'a, C> {
    pub fn new(graph: &'a mut ObservableGraph<C>) -> Self {
        Self { graph }
    }

    /// Observes the whole data tree under the root node.
    pub fn observe_root(&mut self, data: &Value) -> Result<NodeId> {
        let root = self.graph.root();
        self.observe(data, root, &Path::root())
    }

    /// Observes the members of `data`, which lives at `base`, under `parent`.
    ///
    /// Returns `parent`.
    pub fn observe(&mut self, data: &Value, parent: NodeId, base: &Path) -> Result<NodeId> {
        for (segment, member) in data.members() {
            let key = segment.key();
            let path = base.child(segment);
            let id = match self.graph.child_by_key(parent, &key) {
                Some(existing) => existing,
                None => {
                    let id = self
                        .graph
                        .insert(key, NodeSource::Data(path.clone()), Some(parent))?;
                    debug!(node = id, path = %path, "registered node");
                    id
                }
            };
            if member.is_container() {
                self.observe(member, id, &path)?;
            }
        }
        Ok(parent)
    }

    /// Registers a computed property node.
    pub fn computed(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let id = self.graph.insert_computed(name.clone());
        debug!(node = id, name = %name, "registered computed node");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeSource;
    use alloc::vec;
    use weft_core::{Object, Segment};

    fn sample() -> Value {
        let mut user = Object::new();
        user.insert("username", Value::from("Username"));
        let mut root = Object::new();
        root.insert("user", Value::Object(user));
        root.insert(
            "fruits",
            Value::Array(vec!["Apple".into(), "Orange".into(), "Pineapple".into()]),
        );
        root.insert("count", Value::from(1));
        Value::Object(root)
    }

    fn field(name: &str) -> Segment {
        Segment::Field(name.into())
    }

    #[test]
    fn test_one_node_per_property() {
        let mut graph: ObservableGraph<()> = ObservableGraph::new();
        GraphBuilder::new(&mut graph).observe_root(&sample()).unwrap();

        // root, user, username, fruits, 3 elements, count
        assert_eq!(graph.len(), 8);
        let root = graph.root();
        let keys: vec::Vec<&str> = graph
            .children_of(root)
            .unwrap()
            .iter()
            .map(|id| graph.get(*id).unwrap().key())
            .collect();
        assert_eq!(keys, vec!["user", "fruits", "count"]);
    }

    #[test]
    fn test_sources_are_data_paths() {
        let mut graph: ObservableGraph<()> = ObservableGraph::new();
        GraphBuilder::new(&mut graph).observe_root(&sample()).unwrap();

        let path = Path::from(vec![field("fruits"), Segment::Index(2)]);
        let id = graph.resolve(&path).unwrap();
        assert_eq!(graph.get(id).unwrap().source(), &NodeSource::Data(path));
        assert_eq!(graph.get(id).unwrap().key(), "2");
    }

    #[test]
    fn test_reobserve_adds_only_new_members() {
        let mut graph: ObservableGraph<()> = ObservableGraph::new();
        let mut data = sample();
        GraphBuilder::new(&mut graph).observe_root(&data).unwrap();
        let first = graph
            .resolve(&Path::from(vec![field("fruits"), Segment::Index(0)]))
            .unwrap();

        let fruits = Path::from(vec![field("fruits"), Segment::Index(3)]);
        data.set_path(&fruits, Value::from("Mango")).unwrap();
        let fruits_node = graph.resolve(&fruits.prefix(1)).unwrap();
        GraphBuilder::new(&mut graph)
            .observe(data.get_path(&fruits.prefix(1)).unwrap(), fruits_node, &fruits.prefix(1))
            .unwrap();

        assert_eq!(graph.len(), 9);
        assert_eq!(
            graph.resolve(&Path::from(vec![field("fruits"), Segment::Index(0)])),
            Some(first)
        );
        assert!(graph.resolve(&fruits).is_some());
    }

    #[test]
    fn test_scalar_root_has_no_children() {
        let mut graph: ObservableGraph<()> = ObservableGraph::new();
        GraphBuilder::new(&mut graph).observe_root(&Value::from(3)).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_computed() {
        let mut graph: ObservableGraph<()> = ObservableGraph::new();
        let id = GraphBuilder::new(&mut graph).computed("json");
        assert_eq!(
            graph.get(id).unwrap().source(),
            &NodeSource::Computed("json".into())
        );
    }
}
