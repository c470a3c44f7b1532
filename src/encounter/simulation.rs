//! 多次迭代的驱动
//!
//! 每次迭代：新的 `Simulator`、重置后的世界、`base_seed + i` 作为种子。

use super::agent_turn::request_agent_turn;
use super::report::{IterationReport, SimResult, SimSummary};
use super::world::CombatWorld;
use crate::aura::activate_permanent_auras;
use crate::error::ConfigError;
use crate::log::{CombatEvent, CombatLogger};
use crate::resource::start_regen;
use crate::sim::{SimTime, Simulator};
use crate::unit::UnitId;
use tracing::info;

pub struct Simulation {
    world: CombatWorld,
    base_seed: u64,
}

impl Simulation {
    /// 定版世界并准备运行。
    pub fn new(mut world: CombatWorld, base_seed: u64) -> Result<Self, ConfigError> {
        world.finalize()?;
        Ok(Self { world, base_seed })
    }

    pub fn world(&self) -> &CombatWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut CombatWorld {
        &mut self.world
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// 打开/关闭战斗日志。
    pub fn set_logging(&mut self, enabled: bool) {
        self.world.log = enabled.then(CombatLogger::default);
    }

    /// 取走最近一次迭代的战斗日志。
    pub fn take_log(&mut self) -> Vec<CombatEvent> {
        self.world
            .log
            .as_mut()
            .map(|log| std::mem::take(&mut log.events))
            .unwrap_or_default()
    }

    /// 运行第 `iteration` 次迭代（种子 `base_seed + iteration`）。
    #[tracing::instrument(skip(self), fields(seed = self.base_seed.wrapping_add(iteration)))]
    pub fn run_iteration(&mut self, iteration: u64) -> IterationReport {
        let seed = self.base_seed.wrapping_add(iteration);
        let mut sim = Simulator::default();
        self.world.reset(seed, iteration);
        start_iteration(&mut sim, &mut self.world);

        let duration = self.world.duration;
        sim.run_until(duration, &mut self.world);

        let now = sim.now();
        for unit in &mut self.world.units {
            unit.auras.finish(now);
        }
        let report = IterationReport::collect(&self.world, iteration, seed);
        info!(
            iteration,
            executed = sim.executed(),
            pending = sim.pending(),
            "迭代结束"
        );
        report
    }

    pub fn run(&mut self, iterations: u64) -> SimResult {
        let reports: Vec<IterationReport> = (0..iterations).map(|i| self.run_iteration(i)).collect();
        let summary = SimSummary::from_reports(&reports, self.base_seed);
        for u in &summary.units {
            info!(unit = %u.label, mean = u.mean, stdev = u.stdev, min = u.min, max = u.max, "DPS 汇总");
        }
        SimResult {
            summary,
            iterations: reports,
        }
    }
}

/// 迭代开始：永久光环、战前准备、资源回复、第一次代理回合。
fn start_iteration(sim: &mut Simulator, world: &mut CombatWorld) {
    let ids: Vec<UnitId> = world.units.iter().map(|u| u.id).collect();
    for &id in &ids {
        activate_permanent_auras(sim, world, id);
    }
    for &id in &ids {
        if let Some(mut agent) = world.unit_mut(id).agent.take() {
            agent.buff_up(sim, world, id);
            world.unit_mut(id).agent = Some(agent);
        }
    }
    for &id in &ids {
        start_regen(sim, world, id);
    }
    for &id in &ids {
        if world.unit(id).agent.is_some() {
            request_agent_turn(sim, world, id, SimTime::ZERO);
        }
    }
}
