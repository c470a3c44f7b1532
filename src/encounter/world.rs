//! 战斗世界
//!
//! 持有单位、技能、随机源和战斗日志。事件通过 `World::as_any_mut`
//! 向下转型拿到它。

use crate::aura::AuraId;
use crate::cooldown::{ActivationFactory, CooldownActivation, MajorCooldownConfig, reset_major_cooldowns};
use crate::error::ConfigError;
use crate::log::{CombatEvent, CombatEventKind, CombatLogger};
use crate::random::{RandomDraw, RandomSource};
use crate::sim::{SimTime, Simulator, World};
use crate::spell::{self, ApplyEffects, Spell, SpellConfig, SpellId};
use crate::timer::Cooldown;
use crate::unit::{Unit, UnitId, UnitKind};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct CombatWorld {
    pub units: Vec<Unit>,
    /// 遭遇中的目标（按加入顺序，下标即 `Unit::target_index`）。
    pub targets: Vec<UnitId>,
    pub spells: Vec<Spell>,
    pub rng: Box<dyn RandomDraw>,
    pub duration: SimTime,
    pub log: Option<CombatLogger>,
    next_aura_id: u32,
    finalized: bool,
    iteration: u64,
}

impl CombatWorld {
    pub fn new(duration: SimTime) -> Self {
        Self::with_rng(duration, Box::new(RandomSource::new(0)))
    }

    pub fn with_rng(duration: SimTime, rng: Box<dyn RandomDraw>) -> Self {
        Self {
            units: Vec::new(),
            targets: Vec::new(),
            spells: Vec::new(),
            rng,
            duration,
            log: None,
            next_aura_id: AuraId::FIRST_DYNAMIC,
            finalized: false,
            iteration: 0,
        }
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0]
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.units[id.0]
    }

    pub fn spell(&self, id: SpellId) -> &Spell {
        &self.spells[id.0]
    }

    pub fn spell_mut(&mut self, id: SpellId) -> &mut Spell {
        &mut self.spells[id.0]
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// 第一个目标；没有目标的世界无法定版，所以定版后总是存在。
    pub fn primary_target(&self) -> UnitId {
        self.targets.first().copied().unwrap_or_default()
    }

    pub fn players(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().filter(|u| u.is_player()).map(|u| u.id)
    }

    /// 按技能标签查找某单位的技能。
    pub fn find_spell(&self, unit: UnitId, label: &str) -> Option<SpellId> {
        self.unit(unit)
            .spells
            .iter()
            .copied()
            .find(|s| self.spell(*s).label == label)
    }

    /// 结算一次效果需要的几个只读部分加上随机源（字段级拆分借用）。
    pub(crate) fn resolve_parts(
        &mut self,
        caster: UnitId,
        target: UnitId,
        spell: SpellId,
    ) -> (&Unit, &Unit, &Spell, &mut dyn RandomDraw) {
        (
            &self.units[caster.0],
            &self.units[target.0],
            &self.spells[spell.0],
            self.rng.as_mut(),
        )
    }

    pub fn logging(&self) -> bool {
        self.log.is_some()
    }

    pub fn log_event(&mut self, at: SimTime, unit: UnitId, kind: CombatEventKind) {
        if let Some(log) = &mut self.log {
            log.push(CombatEvent {
                t_ns: at.0,
                unit: unit.0,
                kind,
            });
        }
    }

    fn ensure_open(&self, what: &'static str) -> Result<(), ConfigError> {
        if self.finalized {
            Err(ConfigError::Finalized { what })
        } else {
            Ok(())
        }
    }

    pub fn add_player(&mut self, label: impl Into<String>, level: u32) -> Result<UnitId, ConfigError> {
        self.ensure_open("player")?;
        let id = UnitId(self.units.len());
        self.units.push(Unit::new(id, label, UnitKind::Player, level));
        Ok(id)
    }

    pub fn add_target(&mut self, label: impl Into<String>, level: u32) -> Result<UnitId, ConfigError> {
        self.ensure_open("target")?;
        let id = UnitId(self.units.len());
        let mut unit = Unit::new(id, label, UnitKind::Target, level);
        unit.target_index = Some(self.targets.len());
        self.units.push(unit);
        self.targets.push(id);
        Ok(id)
    }

    /// 分配一个动态光环编号（固定编号都小于 `AuraId::FIRST_DYNAMIC`）。
    pub fn new_aura_id(&mut self) -> AuraId {
        let id = AuraId(self.next_aura_id);
        self.next_aura_id += 1;
        id
    }

    /// 在单位的计时器库里新建一个冷却。
    pub fn new_cooldown(&mut self, unit: UnitId, duration: SimTime) -> Cooldown {
        let timer = self.unit_mut(unit).timers.new_timer();
        Cooldown { timer, duration }
    }

    /// 注册技能。冷却计时器与 DoT 光环编号在这里分配。
    pub fn register_spell(&mut self, unit: UnitId, mut config: SpellConfig) -> Result<SpellId, ConfigError> {
        self.ensure_open("spell")?;
        if config.action_id.is_none() {
            return Err(ConfigError::Invalid(format!(
                "spell '{}' must have an action id",
                config.label
            )));
        }
        if let ApplyEffects::Dot { dot, .. } = &mut config.apply_effects {
            if dot.aura_id.is_none() {
                dot.aura_id = Some(self.new_aura_id());
            }
        }
        let cooldown = config.cooldown.map(|d| self.new_cooldown(unit, d));
        let id = SpellId(self.spells.len());
        let spell = Spell::from_config(id, unit, config, cooldown, self.targets.len().max(1));
        debug!(spell = id.0, unit = unit.0, label = %spell.label, cost = spell.cost, "注册技能");
        self.spells.push(spell);
        self.unit_mut(unit).spells.push(id);
        Ok(id)
    }

    /// 注册大招。技能驱动的大招从技能补全动作标识、冷却、GCD 与读条时间，
    /// 未给激活函数时默认对主目标施放该技能。
    pub fn add_major_cooldown(&mut self, unit: UnitId, mut config: MajorCooldownConfig) -> Result<(), ConfigError> {
        if let Some(spell_id) = config.spell {
            let spell = self
                .spells
                .get(spell_id.0)
                .ok_or_else(|| ConfigError::Invalid(format!("major cooldown refers to unknown spell #{}", spell_id.0)))?;
            config.action_id.get_or_insert(spell.action_id);
            config.cooldown = config.cooldown.or(spell.cooldown);
            config.shared_cooldown = config.shared_cooldown.or(spell.shared_cooldown);
            config.uses_gcd = config.uses_gcd || spell.gcd > SimTime::ZERO;
            if config.cast_time == SimTime::ZERO {
                config.cast_time = spell.cast_time;
            }
            if config.activation_factory.is_none() {
                let factory: ActivationFactory = Arc::new(move |_world: &CombatWorld, _unit: UnitId| {
                    let activation: CooldownActivation =
                        Box::new(move |sim: &mut Simulator, world: &mut CombatWorld, _unit: UnitId| {
                            let target = world.primary_target();
                            if let Err(err) = spell::cast(sim, world, spell_id, target) {
                                warn!(spell = spell_id.0, %err, "大招施法失败");
                            }
                        });
                    activation
                });
                config.activation_factory = Some(factory);
            }
        }
        self.unit_mut(unit).cooldowns.add(config)
    }

    /// 定版：之后不能再注册单位、技能、大招或属性依赖。
    pub fn finalize(&mut self) -> Result<(), ConfigError> {
        if self.finalized {
            return Ok(());
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        let num_targets = self.targets.len();
        for spell in &mut self.spells {
            spell.metrics.resize(num_targets, Default::default());
        }
        for unit in &mut self.units {
            unit.finalize();
            unit.auras.finalize();
        }
        self.finalized = true;
        Ok(())
    }

    /// 迭代间重置：单位状态、技能统计、大招列表、代理与随机源。
    pub fn reset(&mut self, seed: u64, iteration: u64) {
        self.iteration = iteration;
        self.rng.reseed(seed);
        for spell in &mut self.spells {
            spell.reset();
        }
        for unit in &mut self.units {
            unit.reset();
            if let Some(agent) = &mut unit.agent {
                agent.reset();
            }
        }
        for idx in 0..self.units.len() {
            reset_major_cooldowns(self, UnitId(idx));
        }
        if let Some(log) = &mut self.log {
            log.events.clear();
        }
    }
}

impl World for CombatWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// 从 `&mut dyn World` 拿到战斗世界。
pub fn combat_world(world: &mut dyn World) -> &mut CombatWorld {
    world
        .as_any_mut()
        .downcast_mut::<CombatWorld>()
        .expect("world must be CombatWorld")
}
