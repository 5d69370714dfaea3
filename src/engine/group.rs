//! Router groups: prefix namespaces carrying middleware.

use crate::routing::error::{RouteError, RouteResult};

/// Handle to a group inside a [`GroupTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

impl GroupId {
    /// The root group of every tree.
    pub const ROOT: GroupId = GroupId(0);
}

#[derive(Debug)]
struct RouterGroup<H> {
    /// Absolute prefix, fixed when the group is derived.
    prefix: String,
    middlewares: Vec<H>,
    parent: Option<GroupId>,
}

/// Arena of router groups in creation order.
///
/// The root group always exists at index 0 with an empty prefix.
#[derive(Debug)]
pub struct GroupTree<H> {
    groups: Vec<RouterGroup<H>>,
}

impl<H> Default for GroupTree<H> {
    fn default() -> Self {
        Self {
            groups: vec![RouterGroup {
                prefix: String::new(),
                middlewares: Vec::new(),
                parent: None,
            }],
        }
    }
}

impl<H: Clone> GroupTree<H> {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, id: GroupId) -> RouteResult<&RouterGroup<H>> {
        self.groups.get(id.0).ok_or(RouteError::UnknownGroup(id.0))
    }

    /// Create a child group whose prefix is `parent.prefix + relative`.
    pub fn derive(&mut self, parent: GroupId, relative: &str) -> RouteResult<GroupId> {
        let prefix = format!("{}{}", self.get(parent)?.prefix, relative);
        let id = GroupId(self.groups.len());

        tracing::debug!(group = id.0, prefix = %prefix, "Router group created");
        self.groups.push(RouterGroup {
            prefix,
            middlewares: Vec::new(),
            parent: Some(parent),
        });

        Ok(id)
    }

    /// Append middlewares to a group.
    pub fn use_middleware<I>(&mut self, group: GroupId, middlewares: I) -> RouteResult<()>
    where
        I: IntoIterator<Item = H>,
    {
        let group = self
            .groups
            .get_mut(group.0)
            .ok_or(RouteError::UnknownGroup(group.0))?;
        group.middlewares.extend(middlewares);
        Ok(())
    }

    pub fn prefix(&self, group: GroupId) -> RouteResult<&str> {
        Ok(&self.get(group)?.prefix)
    }

    pub fn parent(&self, group: GroupId) -> RouteResult<Option<GroupId>> {
        Ok(self.get(group)?.parent)
    }

    /// Middlewares of every group whose prefix starts `path`, concatenated
    /// in group creation order. Duplicates are kept.
    pub fn resolve_middlewares(&self, path: &str) -> Vec<H> {
        self.groups
            .iter()
            .filter(|group| path.starts_with(&group.prefix))
            .flat_map(|group| group.middlewares.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
