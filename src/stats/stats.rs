//! 属性向量
//!
//! 每种 `Stat` 一个浮点槽位的定长向量，支持逐项加减与缩放。
//! 序列化时只写非零项（`{ "attack_power": 1200.0, ... }`）。

use super::stat::Stat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Sub, SubAssign};

#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Stat, f64>", into = "BTreeMap<Stat, f64>")]
pub struct Stats([f64; Stat::LEN]);

impl Default for Stats {
    fn default() -> Self {
        Stats([0.0; Stat::LEN])
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(Stat, f64)]) -> Self {
        let mut s = Self::default();
        for &(stat, v) in pairs {
            s[stat] += v;
        }
        s
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn equals_with_tolerance(&self, other: &Stats, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// 非零项（按枚举顺序）。
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::ALL
            .iter()
            .map(|s| (*s, self.0[s.index()]))
            .filter(|(_, v)| *v != 0.0)
    }
}

impl Index<Stat> for Stats {
    type Output = f64;
    fn index(&self, stat: Stat) -> &f64 {
        &self.0[stat.index()]
    }
}

impl IndexMut<Stat> for Stats {
    fn index_mut(&mut self, stat: Stat) -> &mut f64 {
        &mut self.0[stat.index()]
    }
}

impl Add for Stats {
    type Output = Stats;
    fn add(mut self, rhs: Stats) -> Stats {
        self += rhs;
        self
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Stats) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a += b;
        }
    }
}

impl Sub for Stats {
    type Output = Stats;
    fn sub(mut self, rhs: Stats) -> Stats {
        self -= rhs;
        self
    }
}

impl SubAssign for Stats {
    fn sub_assign(&mut self, rhs: Stats) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a -= b;
        }
    }
}

impl Mul<f64> for Stats {
    type Output = Stats;
    fn mul(mut self, rhs: f64) -> Stats {
        for a in self.0.iter_mut() {
            *a *= rhs;
        }
        self
    }
}

impl From<BTreeMap<Stat, f64>> for Stats {
    fn from(map: BTreeMap<Stat, f64>) -> Self {
        let mut s = Stats::default();
        for (stat, v) in map {
            s[stat] = v;
        }
        s
    }
}

impl From<Stats> for BTreeMap<Stat, f64> {
    fn from(s: Stats) -> Self {
        s.iter_nonzero().collect()
    }
}

impl fmt::Debug for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter_nonzero().map(|(s, v)| (s.name(), v)))
            .finish()
    }
}
