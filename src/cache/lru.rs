//! LRU List Module
//!
//! Recency ordering for content store eviction.

// == LRU Handle ==
/// Handle to a node in an [`LruList`].
///
/// Handles carry the generation of the slot they were issued for, so a handle
/// to a removed node never aliases a node that later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LruHandle {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node<T> {
    payload: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

// == LRU List ==
/// Doubly linked recency list backed by a slot vector.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// Links are slot indices instead of pointers. Every operation is O(1).
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Head ==
    /// Inserts a payload at the head and returns its handle.
    pub fn push_head(&mut self, payload: T) -> LruHandle {
        let node = Node {
            payload,
            prev: None,
            next: None,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };

        self.link_head(index);
        self.len += 1;

        LruHandle {
            index,
            generation: self.slots[index].generation,
        }
    }

    // == Move To Head ==
    /// Marks the node as most recently used.
    ///
    /// Returns false if the handle is stale.
    pub fn move_to_head(&mut self, handle: LruHandle) -> bool {
        if !self.is_live(handle) {
            return false;
        }
        if self.head != Some(handle.index) {
            self.unlink(handle.index);
            self.link_head(handle.index);
        }
        true
    }

    // == Remove ==
    /// Unlinks the node and returns its payload.
    ///
    /// The handle is dead afterwards; removing it again returns None.
    pub fn remove(&mut self, handle: LruHandle) -> Option<T> {
        if !self.is_live(handle) {
            return None;
        }
        Some(self.release(handle.index))
    }

    // == Pop Tail ==
    /// Removes and returns the least recently used payload.
    pub fn pop_tail(&mut self) -> Option<T> {
        let index = self.tail?;
        Some(self.release(index))
    }

    // == Peek ==
    /// Returns the least recently used payload without removing it.
    pub fn peek_tail(&self) -> Option<&T> {
        self.tail.and_then(|index| self.payload_at(index))
    }

    /// Returns the most recently used payload.
    pub fn peek_head(&self) -> Option<&T> {
        self.head.and_then(|index| self.payload_at(index))
    }

    /// Returns the payload behind a live handle.
    pub fn get(&self, handle: LruHandle) -> Option<&T> {
        if self.is_live(handle) {
            self.payload_at(handle.index)
        } else {
            None
        }
    }

    // == Length ==
    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates payloads from head (most recent) to tail (least recent).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Clear ==
    /// Drops every node. Outstanding handles become stale.
    pub fn clear(&mut self) {
        while self.pop_tail().is_some() {}
    }

    // == Internals ==
    fn is_live(&self, handle: LruHandle) -> bool {
        self.slots
            .get(handle.index)
            .map(|slot| slot.generation == handle.generation && slot.node.is_some())
            .unwrap_or(false)
    }

    fn payload_at(&self, index: usize) -> Option<&T> {
        self.slots[index].node.as_ref().map(|node| &node.payload)
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        self.slots[index]
            .node
            .as_mut()
            .expect("linked LRU slot must hold a node")
    }

    fn link_head(&mut self, index: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(index);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old) => self.node_mut(old).prev = Some(index),
            None => self.tail = Some(index),
        }
        self.head = Some(index);
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = {
            let node = self.node_mut(index);
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn release(&mut self, index: usize) -> T {
        self.unlink(index);
        let slot = &mut self.slots[index];
        let node = slot
            .node
            .take()
            .expect("linked LRU slot must hold a node");
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        node.payload
    }
}

// == Iterator ==
/// Head-to-tail iterator over an [`LruList`].
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let node = self.list.slots[index].node.as_ref()?;
        self.cursor = node.next;
        Some(&node.payload)
    }
}
