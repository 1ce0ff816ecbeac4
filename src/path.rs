use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Control-point tension for Catmull-Rom style smoothing.
pub const TENSION: f32 = 0.3;
/// Maximum per-axis control-point perturbation for organic curves.
pub const ORGANIC_WOBBLE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// End points of every drawing command, in order.
    pub fn anchors(&self) -> Vec<Point> {
        self.commands
            .iter()
            .map(|command| match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
                PathCommand::CubicTo { to, .. } => to,
            })
            .collect()
    }

    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            if !d.is_empty() {
                d.push(' ');
            }
            let segment = match command {
                PathCommand::MoveTo(p) => format!("M {:.2} {:.2}", p.x, p.y),
                PathCommand::LineTo(p) => format!("L {:.2} {:.2}", p.x, p.y),
                PathCommand::CubicTo { c1, c2, to } => format!(
                    "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                ),
            };
            d.push_str(&segment);
        }
        d
    }
}

fn catmull_rom(points: &[Point], mut jitter: impl FnMut() -> (f32, f32)) -> Path {
    let last = points.len() - 1;
    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(points[0]));
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        let (jx1, jy1) = jitter();
        let (jx2, jy2) = jitter();
        let c1 = Point::new(
            p1.x + (p2.x - p0.x) * TENSION + jx1,
            p1.y + (p2.y - p0.y) * TENSION + jy1,
        );
        let c2 = Point::new(
            p2.x - (p3.x - p1.x) * TENSION + jx2,
            p2.y - (p3.y - p1.y) * TENSION + jy2,
        );
        commands.push(PathCommand::CubicTo { c1, c2, to: p2 });
    }
    Path { commands }
}

/// Smooth curve through every point. Two points give a straight segment.
pub fn smooth_path(points: &[Point]) -> Path {
    match points.len() {
        0 | 1 => Path::default(),
        2 => Path {
            commands: vec![PathCommand::MoveTo(points[0]), PathCommand::LineTo(points[1])],
        },
        _ => catmull_rom(points, || (0.0, 0.0)),
    }
}

/// Hand-drawn variant of [`smooth_path`]: control points are nudged by up to
/// [`ORGANIC_WOBBLE`] on each axis. Anchors stay exact.
pub fn organic_path<R: Rng>(points: &[Point], rng: &mut R) -> Path {
    if points.len() < 2 {
        return Path::default();
    }
    catmull_rom(points, || {
        (
            rng.random_range(-ORGANIC_WOBBLE..=ORGANIC_WOBBLE),
            rng.random_range(-ORGANIC_WOBBLE..=ORGANIC_WOBBLE),
        )
    })
}

/// Seedable jitter source threaded through a render.
#[derive(Debug, Clone)]
pub struct Jitter {
    rng: StdRng,
}

impl Jitter {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RngCore for Jitter {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
