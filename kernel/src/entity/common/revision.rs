use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::marker::PhantomData;

/// Monotonic per-document revision, used as the optimistic-concurrency
/// guard for every read-modify-write against the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision<T>(i64, PhantomData<T>);

impl<T> Revision<T> {
    pub fn new(version: impl Into<i64>) -> Self {
        Self(version.into(), PhantomData)
    }

    /// Revision the document carries after a successful guarded write.
    pub fn next(&self) -> Self {
        Self(self.0 + 1, PhantomData)
    }
}

impl<T> From<i64> for Revision<T> {
    fn from(version: i64) -> Self {
        Self(version, PhantomData)
    }
}

impl<T> AsRef<i64> for Revision<T> {
    fn as_ref(&self) -> &i64 {
        &self.0
    }
}

impl<T> Serialize for Revision<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Revision<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(|version| Self(version, PhantomData))
    }
}

#[cfg(test)]
mod test {
    use super::Revision;

    struct Marker;

    #[test]
    fn next_advances_by_one() {
        let revision = Revision::<Marker>::new(0);
        assert_eq!(revision.next().as_ref(), &1);
        assert_eq!(revision.next().next().as_ref(), &2);
    }
}
