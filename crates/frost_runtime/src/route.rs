//! Scripted player route
//!
//! Stands in for a human at the controls: walks or runs between waypoints,
//! waits where told to and restarts from the top after every respawn.

use frost_gamestate::RouteWaypoint;
use frost_math::Vec3;
use frost_survival::MovementState;

/// Waypoints closer than this count as reached
const ARRIVAL_RADIUS: f32 = 0.1;

/// Input for one fixed tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInput {
    pub displacement: Vec3,
    pub movement: MovementState,
    pub cooling: bool,
}

impl RouteInput {
    fn idle(cooling: bool) -> Self {
        Self {
            displacement: Vec3::ZERO,
            movement: MovementState::IDLE,
            cooling,
        }
    }
}

/// Walks a list of waypoints
#[derive(Debug, Clone)]
pub struct RouteDriver {
    route: Vec<RouteWaypoint>,
    walk_speed: f32,
    run_speed: f32,
    index: usize,
    waited: f32,
}

impl RouteDriver {
    pub fn new(route: Vec<RouteWaypoint>, walk_speed: f32, run_speed: f32) -> Self {
        Self {
            route,
            walk_speed,
            run_speed,
            index: 0,
            waited: 0.0,
        }
    }

    /// Back to the first waypoint
    pub fn restart(&mut self) {
        self.index = 0;
        self.waited = 0.0;
    }

    /// Whether every waypoint has been visited
    pub fn is_finished(&self) -> bool {
        self.index >= self.route.len()
    }

    /// Produce the input for one tick given where the player is now
    pub fn step(&mut self, position: Vec3, dt: f32) -> RouteInput {
        let Some(waypoint) = self.route.get(self.index).copied() else {
            return RouteInput::idle(false);
        };

        let mut offset = waypoint.target - position;
        offset.y = 0.0;
        if offset.length() <= ARRIVAL_RADIUS {
            self.waited += dt;
            if self.waited >= waypoint.wait {
                self.index += 1;
                self.waited = 0.0;
            }
            return RouteInput::idle(waypoint.cooling);
        }

        let speed = if waypoint.run { self.run_speed } else { self.walk_speed };
        let next = position.move_towards(position + offset, speed * dt);
        RouteInput {
            displacement: next - position,
            movement: if waypoint.run {
                MovementState::RUNNING
            } else {
                MovementState::WALKING
            },
            cooling: waypoint.cooling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn waypoint(x: f32, run: bool, wait: f32) -> RouteWaypoint {
        RouteWaypoint {
            target: Vec3::new(x, 0.0, 0.0),
            run,
            wait,
            cooling: false,
        }
    }

    #[test]
    fn test_walks_toward_waypoint() {
        let mut driver = RouteDriver::new(vec![waypoint(10.0, false, 0.0)], 2.5, 6.0);
        let input = driver.step(Vec3::ZERO, 0.1);
        assert_relative_eq!(input.displacement.x, 0.25);
        assert_eq!(input.movement, MovementState::WALKING);
    }

    #[test]
    fn test_runs_when_told() {
        let mut driver = RouteDriver::new(vec![waypoint(10.0, true, 0.0)], 2.5, 6.0);
        let input = driver.step(Vec3::ZERO, 0.1);
        assert_relative_eq!(input.displacement.x, 0.6);
        assert_eq!(input.movement, MovementState::RUNNING);
    }

    #[test]
    fn test_waits_then_advances() {
        let mut driver = RouteDriver::new(vec![waypoint(0.0, false, 0.45), waypoint(5.0, false, 0.0)], 2.5, 6.0);
        for _ in 0..4 {
            let input = driver.step(Vec3::ZERO, 0.1);
            assert_eq!(input.movement, MovementState::IDLE);
        }
        driver.step(Vec3::ZERO, 0.1);
        let input = driver.step(Vec3::ZERO, 0.1);
        assert_eq!(input.movement, MovementState::WALKING);
    }

    #[test]
    fn test_finished_route_idles() {
        let mut driver = RouteDriver::new(Vec::new(), 2.5, 6.0);
        assert!(driver.is_finished());
        assert_eq!(driver.step(Vec3::ZERO, 0.1).displacement, Vec3::ZERO);

        driver = RouteDriver::new(vec![waypoint(0.0, false, 0.0)], 2.5, 6.0);
        driver.step(Vec3::ZERO, 0.1);
        assert!(driver.is_finished());
        driver.restart();
        assert!(!driver.is_finished());
    }
}
