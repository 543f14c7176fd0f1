/// A periodic correspondence between a slave entity and its master entity
///
/// `affine` holds the optional 4x4 transformation (row major) mapping master to
/// slave; it is empty when the file did not provide one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeriodicLink {
    pub entity_dim: i32,
    pub entity_tag: i32,
    pub master_tag: i32,
    pub affine: Vec<f64>,
    /// `[slave node, master node]` pairs
    pub node_pairs: Vec<[u64; 2]>,
}

impl PeriodicLink {
    pub fn new(entity_dim: i32, entity_tag: i32, master_tag: i32) -> Self {
        Self {
            entity_dim,
            entity_tag,
            master_tag,
            ..Self::default()
        }
    }
}
