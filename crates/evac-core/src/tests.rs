//! Unit tests for evac-core primitives.

#[cfg(test)]
mod ids {
    use crate::AgentId;

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod cell {
    use crate::CellPos;

    #[test]
    fn manhattan_distance() {
        let a = CellPos::new(0, 0);
        let b = CellPos::new(2, 2);
        assert_eq!(a.manhattan(b), 4);
        assert_eq!(b.manhattan(a), 4);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn euclidean_distance() {
        let a = CellPos::new(0, 0);
        let b = CellPos::new(3, 4);
        assert!((a.euclidean(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn neighbor_order_is_fixed() {
        let n = CellPos::new(1, 1).neighbors4();
        assert_eq!(
            n,
            [
                CellPos::new(2, 1),
                CellPos::new(0, 1),
                CellPos::new(1, 2),
                CellPos::new(1, 0),
            ]
        );
    }

    #[test]
    fn neighbors_may_go_negative() {
        // Bounds are the grid's job; coordinates must not wrap.
        let n = CellPos::new(0, 0).neighbors4();
        assert!(n.contains(&CellPos::new(-1, 0)));
        assert!(n.contains(&CellPos::new(0, -1)));
    }
}

#[cfg(test)]
mod terrain {
    use crate::{Terrain, TerrainAccess, TerrainSet};

    #[test]
    fn code_roundtrip() {
        for kind in [
            Terrain::Passable,
            Terrain::Blocked,
            Terrain::Danger,
            Terrain::Stairs,
        ] {
            assert_eq!(Terrain::from_code(kind.code()), Some(kind));
        }
        assert_eq!(Terrain::from_code(9), None);
    }

    #[test]
    fn label_roundtrip() {
        assert_eq!(Terrain::from_label("stairs"), Some(Terrain::Stairs));
        assert_eq!(Terrain::from_label("lava"), None);
        assert_eq!(Terrain::Danger.to_string(), "danger");
    }

    #[test]
    fn set_membership() {
        let set: TerrainSet = [Terrain::Stairs, Terrain::Danger].into_iter().collect();
        assert!(set.contains(Terrain::Stairs));
        assert!(set.contains(Terrain::Danger));
        assert!(!set.contains(Terrain::Passable));
        assert!(TerrainSet::EMPTY.is_empty());
    }

    #[test]
    fn access_stair_gating() {
        let wheelchair = TerrainAccess {
            can_use_stairs: false,
            avoided: TerrainSet::EMPTY,
        };
        assert!(!wheelchair.permits(Terrain::Stairs));
        assert!(wheelchair.permits(Terrain::Passable));
    }

    #[test]
    fn access_avoided_terrain() {
        let cautious = TerrainAccess {
            can_use_stairs: true,
            avoided: [Terrain::Danger].into_iter().collect(),
        };
        assert!(!cautious.permits(Terrain::Danger));
        assert!(cautious.permits(Terrain::Stairs));
        assert!(TerrainAccess::UNRESTRICTED.permits(Terrain::Danger));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), 5);
    }

    #[test]
    fn clock_elapsed() {
        let mut clock = SimClock::new(1_700_000_000, 1);
        assert_eq!(clock.current_unix_secs(), 1_700_000_000);
        clock.advance();
        clock.advance();
        assert_eq!(clock.elapsed_secs(), 2);
        assert_eq!(clock.current_unix_secs(), 1_700_000_002);
    }

    #[test]
    fn unix_secs_at_arbitrary_tick() {
        let clock = SimClock::new(100, 2);
        assert_eq!(clock.unix_secs_at(Tick(5)), 110);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(0, 2);
        assert_eq!(clock.ticks_for_secs(3), 2);
        assert_eq!(clock.ticks_for_secs(4), 2);
    }

    #[test]
    fn sim_config_end_tick() {
        let cfg = SimConfig {
            total_ticks: 120,
            ..SimConfig::default()
        };
        assert_eq!(cfg.end_tick(), Tick(120));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            let a: u32 = r1.gen_range(0..1000);
            let b: u32 = r2.gen_range(0..1000);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut r0 = AgentRng::new(1, AgentId(0));
        let mut r1 = AgentRng::new(1, AgentId(1));
        let a: u64 = r0.gen_range(0..u64::MAX);
        let b: u64 = r1.gen_range(0..u64::MAX);
        assert_ne!(a, b, "seeds for adjacent agents should diverge");
    }

    #[test]
    fn choose_on_empty_slice() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = AgentRng::new(0, AgentId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}
