//! Per-kind node behavior behind a capability trait.
//!
//! External plugins implement [`NodeKindHandler`] and register under a
//! kind tag; the core only ever calls through the trait and stays fully
//! functional with just the two built-in kinds.

use std::collections::HashMap;

use crate::config::Theme;
use crate::scene::{Node, KIND_DEFAULT, KIND_GROUP};

/// Capability interface for one node kind.
///
/// `render` returns opaque draw commands for the node body; the core
/// forwards them to the external render pass without interpretation.
pub trait NodeKindHandler {
    /// Draw commands for the node's content area.
    fn render(&self, node: &Node, theme: &Theme) -> String;

    /// Width/height a freshly created node of this kind gets.
    fn default_size(&self) -> (f32, f32);

    /// Called after a node of this kind is created.
    fn on_created(&self, _node: &Node) {}

    /// Called after a node of this kind is removed.
    fn on_removed(&self, _node: &Node) {}

    /// Labels this kind contributes to the node's context menu.
    fn context_menu_items(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Built-in plain content node.
pub struct DefaultKind;

impl NodeKindHandler for DefaultKind {
    fn render(&self, node: &Node, theme: &Theme) -> String {
        let b = node.bounds();
        format!(
            "rect {} {} {} {} fill={} stroke={}; text {} {} {} {}",
            b.x,
            b.y,
            b.width,
            b.height,
            theme.node_fill,
            theme.node_border,
            b.x + 8.0,
            b.y + 16.0,
            theme.node_title,
            node.title,
        )
    }

    fn default_size(&self) -> (f32, f32) {
        (300.0, 200.0)
    }
}

/// Built-in container node.
pub struct GroupKind;

impl NodeKindHandler for GroupKind {
    fn render(&self, node: &Node, theme: &Theme) -> String {
        let b = node.bounds();
        format!(
            "rect {} {} {} {} fill={} stroke={}; text {} {} {} {}",
            b.x,
            b.y,
            b.width,
            b.height,
            theme.group_fill,
            theme.node_border,
            b.x + 8.0,
            b.y + 16.0,
            theme.node_title,
            node.title,
        )
    }

    fn default_size(&self) -> (f32, f32) {
        (600.0, 400.0)
    }
}

/// Kind-keyed handler lookup. Unknown kinds fall back to the default
/// handler so the core never fails on an unregistered tag.
pub struct KindRegistry {
    handlers: HashMap<String, Box<dyn NodeKindHandler>>,
}

impl KindRegistry {
    /// A registry with the two built-in kinds.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };
        registry.register(KIND_DEFAULT, Box::new(DefaultKind));
        registry.register(KIND_GROUP, Box::new(GroupKind));
        registry
    }

    /// Register (or replace) a handler for a kind tag.
    pub fn register(&mut self, kind: &str, handler: Box<dyn NodeKindHandler>) {
        self.handlers.insert(kind.to_string(), handler);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Handler for a kind, falling back to the default kind's handler.
    pub fn handler(&self, kind: &str) -> &dyn NodeKindHandler {
        self.handlers
            .get(kind)
            .or_else(|| self.handlers.get(KIND_DEFAULT))
            .map(|h| h.as_ref())
            .unwrap_or(&DefaultKind)
    }

    pub fn default_size(&self, kind: &str) -> (f32, f32) {
        self.handler(kind).default_size()
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}
