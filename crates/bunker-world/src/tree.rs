use glam::IVec3;

/// One generated tree. Logs are stored bottom-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRecord {
    pub id: u32,
    pub base: IVec3,
    pub logs: Vec<IVec3>,
    pub leaves: Vec<IVec3>,
}

impl TreeRecord {
    pub fn has_log(&self, pos: IVec3) -> bool {
        self.logs.contains(&pos)
    }

    pub fn has_leaf(&self, pos: IVec3) -> bool {
        self.leaves.contains(&pos)
    }

    pub fn block_count(&self) -> usize {
        self.logs.len() + self.leaves.len()
    }
}

/// World-level list of trees, addressed by stable id.
#[derive(Debug, Clone, Default)]
pub struct TreeList {
    trees: Vec<TreeRecord>,
    next_id: u32,
}

impl TreeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tree and return its id.
    pub fn add(&mut self, base: IVec3, logs: Vec<IVec3>, leaves: Vec<IVec3>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.trees.push(TreeRecord {
            id,
            base,
            logs,
            leaves,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeRecord> {
        self.trees.iter()
    }

    pub fn get(&self, id: u32) -> Option<&TreeRecord> {
        self.trees.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut TreeRecord> {
        self.trees.iter_mut().find(|t| t.id == id)
    }

    /// Tree owning the log at `pos`.
    pub fn find_by_log(&self, pos: IVec3) -> Option<&TreeRecord> {
        self.trees.iter().find(|t| t.has_log(pos))
    }

    pub fn remove(&mut self, id: u32) -> Option<TreeRecord> {
        let index = self.trees.iter().position(|t| t.id == id)?;
        Some(self.trees.remove(index))
    }

    /// Forget a single log. The tree is dropped once it has none left.
    /// Returns true if the log belonged to a tree.
    pub fn remove_log(&mut self, pos: IVec3) -> bool {
        let Some(tree) = self.trees.iter_mut().find(|t| t.has_log(pos)) else {
            return false;
        };
        tree.logs.retain(|&p| p != pos);
        if tree.logs.is_empty() {
            let id = tree.id;
            self.remove(id);
        }
        true
    }

    /// Any log of any tree inside the axis-aligned cube of `radius` around `center`.
    pub fn any_log_near(&self, center: IVec3, radius: i32) -> bool {
        self.trees.iter().flat_map(|t| t.logs.iter()).any(|p| {
            let d = (*p - center).abs();
            d.x <= radius && d.y <= radius && d.z <= radius
        })
    }

    pub fn log_count(&self) -> usize {
        self.trees.iter().map(|t| t.logs.len()).sum()
    }
}
