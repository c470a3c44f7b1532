//! 触发掩码：描述一次效果属于哪类攻击，供触发器过滤。

use std::ops::{BitAnd, BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProcMask(pub u32);

impl ProcMask {
    pub const EMPTY: ProcMask = ProcMask(0);
    pub const MELEE_MH_AUTO: ProcMask = ProcMask(1 << 0);
    pub const MELEE_OH_AUTO: ProcMask = ProcMask(1 << 1);
    pub const MELEE_MH_SPECIAL: ProcMask = ProcMask(1 << 2);
    pub const MELEE_OH_SPECIAL: ProcMask = ProcMask(1 << 3);
    pub const RANGED_AUTO: ProcMask = ProcMask(1 << 4);
    pub const RANGED_SPECIAL: ProcMask = ProcMask(1 << 5);
    pub const SPELL_DAMAGE: ProcMask = ProcMask(1 << 6);
    pub const PERIODIC_DAMAGE: ProcMask = ProcMask(1 << 7);

    pub const MELEE_AUTO: ProcMask = ProcMask(Self::MELEE_MH_AUTO.0 | Self::MELEE_OH_AUTO.0);
    pub const MELEE_SPECIAL: ProcMask =
        ProcMask(Self::MELEE_MH_SPECIAL.0 | Self::MELEE_OH_SPECIAL.0);
    pub const MELEE: ProcMask = ProcMask(Self::MELEE_AUTO.0 | Self::MELEE_SPECIAL.0);
    pub const RANGED: ProcMask = ProcMask(Self::RANGED_AUTO.0 | Self::RANGED_SPECIAL.0);
    pub const WHITE_HIT: ProcMask = ProcMask(Self::MELEE_AUTO.0 | Self::RANGED_AUTO.0);

    /// 与 `other` 有任何交集。
    pub fn matches(self, other: ProcMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ProcMask {
    type Output = ProcMask;
    fn bitor(self, rhs: ProcMask) -> ProcMask {
        ProcMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ProcMask {
    fn bitor_assign(&mut self, rhs: ProcMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ProcMask {
    type Output = ProcMask;
    fn bitand(self, rhs: ProcMask) -> ProcMask {
        ProcMask(self.0 & rhs.0)
    }
}
