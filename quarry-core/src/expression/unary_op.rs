#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpType {
    Not,
}
