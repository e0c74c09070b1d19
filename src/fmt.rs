//! Formatting implementation for the Tree and the MapTrie

use std::fmt::{Debug, Formatter, Result};

use crate::family::JointPrefix;
use crate::prefix::Prefix;
use crate::{MapTrie, Tree};

impl<P: Prefix + Debug, T: Debug> Debug for Tree<P, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<P, T> Debug for MapTrie<P, T>
where
    P: JointPrefix,
    P::V4: Debug,
    P::V6: Debug,
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("MapTrie")
            .field("v4", self.v4())
            .field("v6", self.v6())
            .finish()
    }
}
