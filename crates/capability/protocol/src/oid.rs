//! 数字点分 OID。

use crate::error::ProtocolError;
use std::fmt;
use std::str::FromStr;

/// 对象标识符（如 `1.3.6.1.4.1.318`）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(Vec<u64>);

impl Oid {
    /// 解析点分字符串，允许前导 `.`。
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let trimmed = raw.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(ProtocolError::InvalidOid(raw.to_string()));
        }
        let mut arcs = Vec::new();
        for part in trimmed.split('.') {
            let arc = part
                .parse::<u64>()
                .map_err(|_| ProtocolError::InvalidOid(raw.to_string()))?;
            arcs.push(arc);
        }
        if arcs.len() < 2 {
            return Err(ProtocolError::InvalidOid(raw.to_string()));
        }
        Ok(Self(arcs))
    }

    pub fn arcs(&self) -> &[u64] {
        &self.0
    }

    /// 追加一个子节点（常用于端口号）。
    pub fn child(&self, arc: u64) -> Self {
        let mut arcs = self.0.clone();
        arcs.push(arc);
        Self(arcs)
    }

    /// 追加点分后缀（如 `3.1.2.1`）。
    pub fn join(&self, suffix: &str) -> Result<Self, ProtocolError> {
        let mut arcs = self.0.clone();
        for part in suffix.trim().trim_matches('.').split('.') {
            let arc = part
                .parse::<u64>()
                .map_err(|_| ProtocolError::InvalidOid(format!("{self}.{suffix}")))?;
            arcs.push(arc);
        }
        Ok(Self(arcs))
    }

    /// 是否位于 `prefix` 子树内（含自身）。
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Oid {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let oid = Oid::parse(".1.3.6.1.4.1.318").expect("oid");
        assert_eq!(oid.to_string(), "1.3.6.1.4.1.318");
        assert!(Oid::parse("1.3.x").is_err());
        assert!(Oid::parse("").is_err());
    }

    #[test]
    fn join_child_and_prefix() {
        let root = Oid::parse("1.3.6.1.4.1.21317.1.3.2.2.2.1").expect("root");
        let outlet = root.join("5.1.2").expect("join").child(3);
        assert_eq!(outlet.to_string(), "1.3.6.1.4.1.21317.1.3.2.2.2.1.5.1.2.3");
        assert!(outlet.starts_with(&root));
        assert!(!root.starts_with(&outlet));
    }

    #[test]
    fn ordering_is_lexicographic_by_arc() {
        let a = Oid::parse("1.3.6.1.2").expect("a");
        let b = Oid::parse("1.3.6.1.10").expect("b");
        assert!(a < b);
    }
}
