use core::fmt;

/// Handle to a node slot in a [`Links`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A list, identified by its sentinel root node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct List {
    root: NodeId,
}

#[derive(Debug, Clone, Copy)]
enum Role<T> {
    Root { len: usize },
    Member(T),
    Free,
}

/// Prev/next pair plus the back-reference to the owning value.
///
/// A member link with `prev == next == None` is detached.
#[derive(Debug, Clone, Copy)]
pub struct Link<T> {
    prev: Option<NodeId>,
    next: Option<NodeId>,
    role: Role<T>,
}

impl<T: Copy> Link<T> {
    #[inline]
    pub fn is_detached(&self) -> bool {
        self.next.is_none()
    }

    /// Returns the owning value. Roots and free slots have no owner.
    #[inline]
    pub fn owner(&self) -> Option<T> {
        match self.role {
            Role::Member(owner) => Some(owner),
            Role::Root { .. } | Role::Free => None,
        }
    }
}

/// Arena holding the links of any number of lists.
///
/// Invariants:
/// - walking `next` (or `prev`) from a root returns to that root
/// - a root's tracked length equals the number of members in its ring
#[derive(Debug)]
pub struct Links<T> {
    nodes: Vec<Link<T>>,
    free: Vec<u32>,
}

impl<T: Copy> Default for Links<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> Links<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    fn alloc_slot(&mut self, link: Link<T>) -> NodeId {
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = link;
            NodeId(idx)
        } else {
            let idx = self.nodes.len() as u32;
            self.nodes.push(link);
            NodeId(idx)
        }
    }

    #[inline]
    fn link(&self, id: NodeId) -> &Link<T> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    fn link_mut(&mut self, id: NodeId) -> &mut Link<T> {
        &mut self.nodes[id.0 as usize]
    }

    fn adjust_len(&mut self, list: List, grow: bool) {
        if let Role::Root { len } = &mut self.link_mut(list.root).role {
            if grow {
                *len += 1;
            } else {
                *len = len.saturating_sub(1);
            }
        }
    }

    // ── allocation ────────────────────────────────────────────────────────

    /// Creates an empty list (a root whose ring points at itself).
    pub fn new_list(&mut self) -> List {
        let root = self.alloc_slot(Link {
            prev: None,
            next: None,
            role: Role::Root { len: 0 },
        });
        let link = self.link_mut(root);
        link.prev = Some(root);
        link.next = Some(root);
        List { root }
    }

    /// Detaches every member and frees the root slot.
    pub fn free_list(&mut self, list: List) {
        self.clear(list);
        *self.link_mut(list.root) = Link {
            prev: None,
            next: None,
            role: Role::Free,
        };
        self.free.push(list.root.0);
    }

    /// Creates a detached member node owned by `owner`.
    pub fn alloc(&mut self, owner: T) -> NodeId {
        self.alloc_slot(Link {
            prev: None,
            next: None,
            role: Role::Member(owner),
        })
    }

    /// Frees a member node.
    ///
    /// A node that is still linked is unlinked first; its list is located by
    /// walking the ring to the root.
    pub fn release(&mut self, node: NodeId) {
        if !matches!(self.link(node).role, Role::Member(_)) {
            return;
        }
        if !self.link(node).is_detached() {
            if let Some(list) = self.list_of(node) {
                self.remove(list, node);
            }
        }
        *self.link_mut(node) = Link {
            prev: None,
            next: None,
            role: Role::Free,
        };
        self.free.push(node.0);
    }

    fn list_of(&self, node: NodeId) -> Option<List> {
        let mut cur = self.link(node).next?;
        while cur != node {
            if let Role::Root { .. } = self.link(cur).role {
                return Some(List { root: cur });
            }
            cur = self.link(cur).next?;
        }
        None
    }

    // ── splicing ──────────────────────────────────────────────────────────

    /// Links `node` directly before `before` (which may be the list root).
    ///
    /// `node` must be detached; linked nodes are left untouched.
    pub fn insert_before(&mut self, list: List, node: NodeId, before: NodeId) {
        debug_assert!(self.link(node).is_detached(), "insert_before: node is already linked");
        if !self.link(node).is_detached() {
            return;
        }
        let Some(prev) = self.link(before).prev else {
            return;
        };

        {
            let link = self.link_mut(node);
            link.prev = Some(prev);
            link.next = Some(before);
        }
        self.link_mut(prev).next = Some(node);
        self.link_mut(before).prev = Some(node);
        self.adjust_len(list, true);
    }

    #[inline]
    pub fn append(&mut self, list: List, node: NodeId) {
        self.insert_before(list, node, list.root);
    }

    #[inline]
    pub fn prepend(&mut self, list: List, node: NodeId) {
        let first = self.begin(list);
        self.insert_before(list, node, first);
    }

    /// Unlinks `node` from `list`. Returns `false` if it was already detached.
    pub fn remove(&mut self, list: List, node: NodeId) -> bool {
        let link = *self.link(node);
        let (Some(prev), Some(next)) = (link.prev, link.next) else {
            return false;
        };
        if !matches!(link.role, Role::Member(_)) {
            return false;
        }

        self.link_mut(prev).next = Some(next);
        self.link_mut(next).prev = Some(prev);
        let link = self.link_mut(node);
        link.prev = None;
        link.next = None;
        self.adjust_len(list, false);
        true
    }

    /// Detaches every member, leaving an empty ring.
    pub fn clear(&mut self, list: List) {
        let mut cur = self.begin(list);
        while cur != list.root {
            let Some(next) = self.link(cur).next else {
                break;
            };
            let link = self.link_mut(cur);
            link.prev = None;
            link.next = None;
            cur = next;
        }
        let root = self.link_mut(list.root);
        root.prev = Some(list.root);
        root.next = Some(list.root);
        root.role = Role::Root { len: 0 };
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// First node of the list, or the root if empty.
    #[inline]
    pub fn begin(&self, list: List) -> NodeId {
        self.link(list.root).next.unwrap_or(list.root)
    }

    /// The iteration boundary (the sentinel root).
    #[inline]
    pub const fn end(&self, list: List) -> NodeId {
        list.root
    }

    #[inline]
    pub fn first(&self, list: List) -> Option<NodeId> {
        let first = self.begin(list);
        (first != list.root).then_some(first)
    }

    #[inline]
    pub fn last(&self, list: List) -> Option<NodeId> {
        let last = self.link(list.root).prev.unwrap_or(list.root);
        (last != list.root).then_some(last)
    }

    #[inline]
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.link(node).next
    }

    #[inline]
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.link(node).prev
    }

    #[inline]
    pub fn owner(&self, node: NodeId) -> Option<T> {
        self.link(node).owner()
    }

    #[inline]
    pub fn is_linked(&self, node: NodeId) -> bool {
        !self.link(node).is_detached()
    }

    pub fn len(&self, list: List) -> usize {
        match self.link(list.root).role {
            Role::Root { len } => len,
            Role::Member(_) | Role::Free => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self, list: List) -> bool {
        self.begin(list) == list.root
    }

    /// Iterates owners front to back.
    pub fn iter(&self, list: List) -> Iter<'_, T> {
        Iter {
            links: self,
            cur: self.begin(list),
            end: list.root,
        }
    }
}

/// Front-to-back iterator over the owners of a list's members.
pub struct Iter<'a, T> {
    links: &'a Links<T>,
    cur: NodeId,
    end: NodeId,
}

impl<T: Copy> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.cur != self.end {
            let link = self.links.link(self.cur);
            self.cur = link.next?;
            if let Some(owner) = link.owner() {
                return Some(owner);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(n: u32) -> (Links<u32>, List, Vec<NodeId>) {
        let mut links = Links::new();
        let list = links.new_list();
        let nodes = (0..n).map(|i| links.alloc(i)).collect();
        (links, list, nodes)
    }

    fn collect(links: &Links<u32>, list: List) -> Vec<u32> {
        links.iter(list).collect()
    }

    fn ring_is_closed(links: &Links<u32>, list: List) -> bool {
        let mut steps = 0;
        let mut cur = links.begin(list);
        while cur != links.end(list) {
            cur = links.next(cur).unwrap();
            steps += 1;
            if steps > 1000 {
                return false;
            }
        }
        let mut back = 0;
        let mut cur = links.prev(links.end(list)).unwrap();
        while cur != links.end(list) {
            cur = links.prev(cur).unwrap();
            back += 1;
        }
        steps == links.len(list) && back == steps
    }

    // ── empty ring ────────────────────────────────────────────────────────

    #[test]
    fn new_list_is_empty_ring() {
        let (links, list, _) = setup(0);
        assert!(links.is_empty(list));
        assert_eq!(links.len(list), 0);
        assert_eq!(links.begin(list), links.end(list));
        assert!(links.first(list).is_none());
        assert!(links.last(list).is_none());
    }

    // ── splicing ──────────────────────────────────────────────────────────

    #[test]
    fn append_and_prepend_order() {
        let (mut links, list, n) = setup(3);
        links.append(list, n[1]);
        links.append(list, n[2]);
        links.prepend(list, n[0]);
        assert_eq!(collect(&links, list), vec![0, 1, 2]);
        assert_eq!(links.len(list), 3);
        assert!(ring_is_closed(&links, list));
    }

    #[test]
    fn insert_before_middle() {
        let (mut links, list, n) = setup(3);
        links.append(list, n[0]);
        links.append(list, n[2]);
        links.insert_before(list, n[1], n[2]);
        assert_eq!(collect(&links, list), vec![0, 1, 2]);
        assert!(ring_is_closed(&links, list));
    }

    #[test]
    fn insert_before_root_appends() {
        let (mut links, list, n) = setup(2);
        links.append(list, n[0]);
        let end = links.end(list);
        links.insert_before(list, n[1], end);
        assert_eq!(collect(&links, list), vec![0, 1]);
    }

    #[test]
    fn remove_detaches_node() {
        let (mut links, list, n) = setup(3);
        for &node in &n {
            links.append(list, node);
        }
        assert!(links.remove(list, n[1]));
        assert!(!links.is_linked(n[1]));
        assert_eq!(collect(&links, list), vec![0, 2]);
        assert_eq!(links.len(list), 2);
        assert!(ring_is_closed(&links, list));
    }

    #[test]
    fn double_remove_is_noop() {
        let (mut links, list, n) = setup(2);
        links.append(list, n[0]);
        links.append(list, n[1]);
        assert!(links.remove(list, n[0]));
        assert!(!links.remove(list, n[0]));
        assert_eq!(links.len(list), 1);
        assert_eq!(collect(&links, list), vec![1]);
    }

    #[test]
    fn remove_root_is_rejected() {
        let (mut links, list, n) = setup(1);
        links.append(list, n[0]);
        let root = links.end(list);
        assert!(!links.remove(list, root));
        assert_eq!(collect(&links, list), vec![0]);
    }

    #[test]
    fn clear_detaches_all_members() {
        let (mut links, list, n) = setup(3);
        for &node in &n {
            links.append(list, node);
        }
        links.clear(list);
        assert!(links.is_empty(list));
        assert_eq!(links.len(list), 0);
        assert!(n.iter().all(|&node| !links.is_linked(node)));
    }

    // ── release ───────────────────────────────────────────────────────────

    #[test]
    fn release_linked_node_unlinks_first() {
        let (mut links, list, n) = setup(3);
        for &node in &n {
            links.append(list, node);
        }
        links.release(n[1]);
        assert_eq!(collect(&links, list), vec![0, 2]);
        assert_eq!(links.len(list), 2);
        assert!(ring_is_closed(&links, list));
    }

    #[test]
    fn released_slots_are_reused() {
        let (mut links, _list, n) = setup(1);
        links.release(n[0]);
        let again = links.alloc(7);
        assert_eq!(again, n[0]);
        assert_eq!(links.owner(again), Some(7));
    }

    #[test]
    fn lists_share_one_arena() {
        let (mut links, a, n) = setup(4);
        let b = links.new_list();
        links.append(a, n[0]);
        links.append(b, n[1]);
        links.append(a, n[2]);
        links.append(b, n[3]);
        assert_eq!(collect(&links, a), vec![0, 2]);
        assert_eq!(collect(&links, b), vec![1, 3]);
        links.free_list(a);
        assert!(!links.is_linked(n[0]));
        assert_eq!(collect(&links, b), vec![1, 3]);
    }
}
