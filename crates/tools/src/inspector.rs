use forestwalk_common::WorldPoint;
use forestwalk_kernel::{Contact, SimEvent, Simulation, TreeKind};
use serde::Serialize;

/// Simulation inspector for developer tooling.
///
/// Read-only queries against the simulation for debugging and CLI output.
pub struct SimInspector;

impl SimInspector {
    /// Produce a summary of the simulation state.
    pub fn summary(sim: &Simulation) -> SimSummary {
        let c = sim.character();
        let forest = sim.forest();
        let mut jumps = 0;
        let mut collisions = 0;
        let mut gusts = 0;
        for event in sim.events() {
            match event {
                SimEvent::Jumped { .. } => jumps += 1,
                SimEvent::Collided { .. } => collisions += 1,
                SimEvent::GustRolled { .. } => gusts += 1,
                _ => {}
            }
        }
        SimSummary {
            tick: sim.tick(),
            seed: sim.seed(),
            elapsed: sim.elapsed(),
            position: c.position.to_array(),
            yaw: c.yaw,
            grounded: c.movement.contact() == Contact::Grounded,
            in_water: sim.in_water(),
            trees: forest.trees().len(),
            undergrowth: forest.undergrowth().len(),
            elements: forest.elements().len(),
            wind_strength: sim.wind().strength(&sim.config().wind),
            jumps,
            collisions,
            gusts,
            state_hash: sim.state_hash(),
        }
    }

    /// Details of tree `index`, if it exists.
    pub fn inspect_tree(sim: &Simulation, index: usize) -> Option<TreeInfo> {
        let tree = sim.forest().trees().get(index)?;
        let here = WorldPoint::from_vec3(sim.character().position);
        Some(TreeInfo {
            index,
            kind: tree.kind,
            position: [tree.position.x, tree.position.z],
            scale: tree.scale,
            collision_radius: tree.collision_radius,
            distance: tree.position.to_vec2().distance(here.to_vec2()),
        })
    }

    /// The tree closest to the character, measured center to center.
    pub fn nearest_tree(sim: &Simulation) -> Option<TreeInfo> {
        (0..sim.forest().trees().len())
            .filter_map(|i| Self::inspect_tree(sim, i))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Summary of simulation state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub tick: u64,
    pub seed: u64,
    pub elapsed: f64,
    pub position: [f32; 3],
    pub yaw: f32,
    pub grounded: bool,
    /// Water state as of the start of the last frame, as the event log sees it.
    pub in_water: bool,
    pub trees: usize,
    pub undergrowth: usize,
    pub elements: usize,
    pub wind_strength: f32,
    pub jumps: usize,
    pub collisions: usize,
    pub gusts: usize,
    pub state_hash: u64,
}

impl SimSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for SimSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Sim: tick={} seed={} t={:.2}s hash={:016x}",
            self.tick, self.seed, self.elapsed, self.state_hash
        )?;
        writeln!(
            f,
            "  pos=({:.2}, {:.2}, {:.2}) yaw={:.3} grounded={} in_water={}",
            self.position[0], self.position[1], self.position[2], self.yaw, self.grounded, self.in_water
        )?;
        writeln!(
            f,
            "  trees={} undergrowth={} elements={} wind={:.3}",
            self.trees, self.undergrowth, self.elements, self.wind_strength
        )?;
        write!(
            f,
            "  jumps={} collisions={} gusts={}",
            self.jumps, self.collisions, self.gusts
        )
    }
}

/// Detailed info about a single tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeInfo {
    pub index: usize,
    pub kind: TreeKind,
    pub position: [f32; 2],
    pub scale: f32,
    pub collision_radius: f32,
    /// Horizontal distance from the character.
    pub distance: f32,
}

impl std::fmt::Display for TreeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tree [{}] {:?} pos=({:.2}, {:.2}) scale={:.2} r={:.2} dist={:.2}",
            self.index,
            self.kind,
            self.position[0],
            self.position[1],
            self.scale,
            self.collision_radius,
            self.distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestwalk_common::MoveIntent;
    use forestwalk_kernel::{Forest, SimConfig, Tree};

    fn sim_with_trees(trees: Vec<Tree>) -> Simulation {
        let config = SimConfig::default();
        let forest = Forest::from_parts(&config.world, trees, Vec::new(), 3);
        Simulation::with_forest(config, forest, 3).unwrap()
    }

    #[test]
    fn summary_fresh_sim() {
        let sim = sim_with_trees(Vec::new());
        let summary = SimInspector::summary(&sim);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.trees, 0);
        assert!(summary.grounded);
        assert!(!summary.in_water);
        assert_eq!(summary.jumps, 0);
    }

    #[test]
    fn summary_counts_jumps() {
        let mut sim = sim_with_trees(Vec::new());
        let jump = MoveIntent {
            jump: true,
            ..MoveIntent::default()
        };
        sim.step(jump, 1.0 / 60.0);
        let summary = SimInspector::summary(&sim);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.jumps, 1);
        assert!(!summary.grounded);
    }

    #[test]
    fn in_water_agrees_with_event_log() {
        let mut sim = sim_with_trees(Vec::new());
        // Lake for the default world: center (0, -250), half-size 166.7.
        // One step from here crosses the shore at z = -83.3.
        sim.place_character(glam::Vec3::new(0.0, 1.7, -83.2));
        let forward = MoveIntent {
            forward: true,
            ..MoveIntent::default()
        };
        sim.step(forward, 0.1);
        assert!(sim.character().position.z < -83.4);
        let summary = SimInspector::summary(&sim);
        assert!(!summary.in_water);
        assert!(
            !sim
                .events()
                .iter()
                .any(|e| matches!(e, SimEvent::EnteredWater { .. }))
        );

        sim.step(forward, 0.1);
        let summary = SimInspector::summary(&sim);
        assert!(summary.in_water);
        assert!(
            sim.events()
                .iter()
                .any(|e| matches!(e, SimEvent::EnteredWater { .. }))
        );
    }

    #[test]
    fn nearest_tree_picks_closest() {
        let sim = sim_with_trees(vec![
            Tree::new(WorldPoint::new(50.0, 0.0), TreeKind::Pine, 1.0, 0.0),
            Tree::new(WorldPoint::new(0.0, 20.0), TreeKind::Broadleaf, 1.0, 0.0),
        ]);
        let nearest = SimInspector::nearest_tree(&sim).unwrap();
        assert_eq!(nearest.index, 1);
        assert!((nearest.distance - 20.0).abs() < 1e-4);
    }

    #[test]
    fn inspect_tree_out_of_range() {
        let sim = sim_with_trees(Vec::new());
        assert!(SimInspector::inspect_tree(&sim, 0).is_none());
        assert!(SimInspector::nearest_tree(&sim).is_none());
    }

    #[test]
    fn summary_display_and_json() {
        let sim = sim_with_trees(Vec::new());
        let summary = SimInspector::summary(&sim);
        let text = format!("{summary}");
        assert!(text.contains("tick=0"));
        let json = summary.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tick"], 0);
        assert_eq!(value["trees"], 0);
    }
}
