use std::fmt;

/// Handle of a type inside one class model.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Handle of a field, method or constructor inside one class model.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(u32);

impl MemberId {
    pub(crate) fn from_raw(raw: u32) -> Self {
        MemberId(raw)
    }

    #[must_use]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    pub(crate) fn alloc(&mut self, value: T) -> u32 {
        let idx = self.data.len() as u32;
        self.data.push(value);
        idx
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (i as u32, v))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena { data: Vec::new() }
    }
}

impl<T> std::ops::Index<TypeId> for Arena<T> {
    type Output = T;

    fn index(&self, index: TypeId) -> &Self::Output {
        &self.data[index.idx()]
    }
}

impl<T> std::ops::IndexMut<TypeId> for Arena<T> {
    fn index_mut(&mut self, index: TypeId) -> &mut Self::Output {
        &mut self.data[index.idx()]
    }
}

impl<T> std::ops::Index<MemberId> for Arena<T> {
    type Output = T;

    fn index(&self, index: MemberId) -> &Self::Output {
        &self.data[index.idx()]
    }
}

impl<T> std::ops::IndexMut<MemberId> for Arena<T> {
    fn index_mut(&mut self, index: MemberId) -> &mut Self::Output {
        &mut self.data[index.idx()]
    }
}
