use super::normalize_residues;

/// Default identifier for records read without a header.
pub const DEFAULT_ID: &str = "seq";

/// One named input sequence. Residues are upper-case and never change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    id: Box<str>,
    desc: Option<Box<str>>,
    residues: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<Box<str>>, residues: impl AsRef<[u8]>) -> Self {
        Self {
            id: id.into(),
            desc: None,
            residues: normalize_residues(residues.as_ref()),
        }
    }

    /// Unnamed sequence, e.g. typed on the command line.
    pub fn from_residues(residues: impl AsRef<[u8]>) -> Self {
        Self::new(DEFAULT_ID, residues)
    }

    pub fn with_desc(mut self, desc: impl Into<Box<str>>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.residues
    }
}
