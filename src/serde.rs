//! Serialization and Deserialization implementation

use std::collections::HashMap;
use std::hash::Hash;

use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::family::JointPrefix;
use crate::prefix::Prefix;
use crate::{MapTrie, Tree};

impl<P: Prefix + Serialize, T: Serialize> Serialize for Tree<P, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<P: JointPrefix + Serialize, T: Serialize> Serialize for MapTrie<P, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

impl<'de, P: Prefix + Deserialize<'de> + Eq + Hash, T: Deserialize<'de>> Deserialize<'de>
    for Tree<P, T>
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: HashMap<P, T> = HashMap::deserialize(deserializer)?;
        Ok(Self::from_iter(map))
    }
}

impl<'de, P: JointPrefix + Deserialize<'de> + Eq + Hash, T: Deserialize<'de>> Deserialize<'de>
    for MapTrie<P, T>
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: HashMap<P, T> = HashMap::deserialize(deserializer)?;
        Ok(Self::from_iter(map))
    }
}
