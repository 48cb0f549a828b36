use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};
use crate::simulation::params::{CHECKPOINT_COLOUR, ROAD_COLOUR, START_COLOUR};

/// Classification of a single track pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Road,
    Checkpoint,
    Start,
    OffRoad,
}

impl Cell {
    /// Exact palette match; anything that is not a track colour is off-road.
    #[must_use]
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        match rgb {
            ROAD_COLOUR => Self::Road,
            CHECKPOINT_COLOUR => Self::Checkpoint,
            START_COLOUR => Self::Start,
            _ => Self::OffRoad,
        }
    }

    /// Road, checkpoint and start cells are all drivable.
    #[must_use]
    pub const fn is_road(self) -> bool {
        !matches!(self, Self::OffRoad)
    }
}

/// Spawn pose derived from the start line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartPose {
    pub x: f64,
    pub y: f64,
    /// Degrees, counter-clockwise, not yet normalized.
    pub heading: f64,
}

/// The race track: an immutable raster of classified cells.
///
/// Coordinates are screen pixels (y grows downwards). Any query outside the
/// raster reports [`Cell::OffRoad`].
#[derive(Clone, Debug)]
pub struct Track {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Track {
    /// Loads a track image and scales it to the window size.
    pub fn load<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self> {
        let img = image::open(path.as_ref())?.into_rgb8();
        Ok(Self::from_image_scaled(&img, width, height))
    }

    /// Classifies `img` resampled to `width × height`.
    ///
    /// Nearest-neighbour on integer coordinates, so no blended colours can
    /// appear between palette entries.
    #[must_use]
    pub fn from_image_scaled(img: &RgbImage, width: u32, height: u32) -> Self {
        let (src_w, src_h) = img.dimensions();
        if src_w == 0 || src_h == 0 {
            return Self::from_fn(width, height, |_, _| Cell::OffRoad);
        }
        Self::from_fn(width, height, |x, y| {
            let sx = (u64::from(x) * u64::from(src_w) / u64::from(width)) as u32;
            let sy = (u64::from(y) * u64::from(src_h) / u64::from(height)) as u32;
            Cell::from_rgb(img.get_pixel(sx, sy).0)
        })
    }

    /// Builds a track by classifying each `(x, y)` with `f`.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> Cell) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// Classifies an integer pixel coordinate.
    #[must_use]
    pub fn classify(&self, x: i64, y: i64) -> Cell {
        if !self.in_bounds(x, y) {
            return Cell::OffRoad;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Classifies a continuous position by the pixel that contains it.
    #[must_use]
    pub fn classify_point(&self, x: f64, y: f64) -> Cell {
        if x < 0.0 || y < 0.0 || x >= f64::from(self.width) || y >= f64::from(self.height) {
            return Cell::OffRoad;
        }
        self.classify(x as i64, y as i64)
    }

    #[must_use]
    pub fn is_on_road(&self, x: f64, y: f64) -> bool {
        self.classify_point(x, y).is_road()
    }

    /// Finds the spawn pose: the first start cell (row-major) with a road
    /// cell as a 4-neighbour. The heading points at that neighbour.
    pub fn find_start(&self) -> Result<StartPose> {
        const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

        for y in 0..i64::from(self.height) {
            for x in 0..i64::from(self.width) {
                if self.classify(x, y) != Cell::Start {
                    continue;
                }
                for (dx, dy) in NEIGHBOURS {
                    if self.classify(x + dx, y + dy) == Cell::Road {
                        return Ok(StartPose {
                            x: x as f64,
                            y: y as f64,
                            heading: ((-dy) as f64).atan2(dx as f64).to_degrees(),
                        });
                    }
                }
            }
        }
        Err(Error::NoStartFound)
    }
}
