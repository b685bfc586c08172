//! Recoil pattern preview - random walks rendered into an RGBA raster.
//!
//! Each walk starts at the raster center and steps once per simulated shot by
//! a freshly sampled impulse, leaving a colored marker at every shot position.
//! Overlaying several walks shows how wide and how consistent a weapon's
//! recoil is. State multipliers are not applied.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::RecoilParameters;
use crate::systems::sampler::sample_axis;

/// Pixels moved per recoil unit between two shots.
pub const PREVIEW_STEP_SCALE: f32 = 5.0;

/// Raster background (opaque black).
pub const PREVIEW_BACKGROUND: [u8; 4] = [0, 0, 0, 255];

const LANES: usize = 4;

/// Preview generation settings.
///
/// # Fields
/// * `shots_per_iteration` - Shots simulated per walk
/// * `iterations` - Number of walks overlaid
/// * `marker_radius` - Radius of each shot marker in pixels
/// * `width` / `height` - Raster size in pixels
/// * `seed` - Random seed, so the same parameters always produce the same picture
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreviewSettings {
    pub shots_per_iteration: u32,
    pub iterations: u32,
    pub marker_radius: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub seed: u64,
}

impl Default for PreviewSettings {
    /// Default values:
    /// - 10 shots per walk, 10 walks
    /// - 2 pixel markers
    /// - 512x512 raster
    /// - Seed 0
    fn default() -> Self {
        Self {
            shots_per_iteration: 10,
            iterations: 10,
            marker_radius: 2,
            width: 512,
            height: 512,
            seed: 0,
        }
    }
}

/// RGBA8 pixel buffer, row-major with the origin at the top left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewRaster {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl PreviewRaster {
    /// Creates a raster filled with [`PREVIEW_BACKGROUND`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PREVIEW_BACKGROUND; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    /// Number of pixels that differ from the background.
    pub fn marked_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p != PREVIEW_BACKGROUND).count()
    }

    /// Fill a disc of `radius` around `(cx, cy)`, clipped to the raster.
    ///
    /// Radii are capped at `width + height`, which covers the whole raster from
    /// any center inside it.
    pub fn fill_disc(&mut self, cx: i32, cy: i32, radius: u32, color: [u8; 4]) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let r = i64::from(radius.min(self.width.saturating_add(self.height)));
        let (cx, cy) = (i64::from(cx), i64::from(cy));

        // Only visit rows and columns inside the raster.
        let (x_min, x_max) = ((cx - r).max(0), (cx + r).min(i64::from(self.width) - 1));
        let (y_min, y_max) = ((cy - r).max(0), (cy + r).min(i64::from(self.height) - 1));

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let index = self.index(x as u32, y as u32);
                self.pixels[index] = color;
            }
        }
    }

    /// Copy into a Bevy [`Image`] usable as a UI or sprite texture.
    pub fn to_image(&self) -> Image {
        use bevy::asset::RenderAssetUsages;
        use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

        Image::new(
            Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            self.pixels.iter().flatten().copied().collect(),
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        )
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Marker color for a shot: red at the first shot, yellow halfway, green at
/// the last.
///
/// A single-shot walk counts as progress 0 and is red.
pub fn gradient_color(shot: u32, total_shots: u32) -> [u8; 4] {
    let progress = if total_shots > 1 {
        shot as f32 / (total_shots - 1) as f32
    } else {
        0.0
    };
    let progress = progress.clamp(0.0, 1.0);

    let (red, green) = if progress < 0.5 {
        (255.0, 255.0 * progress / 0.5)
    } else {
        (255.0 - 255.0 * (progress - 0.5) / 0.5, 255.0)
    };
    [red.round() as u8, green.round() as u8, 0, 255]
}

/// Render `settings.iterations` random walks of `settings.shots_per_iteration`
/// shots each.
///
/// # Returns
/// A `width x height` raster; zero shots or iterations leave it blank
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::components::RecoilParameters;
/// use bevy_recoil_dynamics::systems::preview::{generate_pattern, PreviewSettings};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let settings = PreviewSettings::default();
/// let mut rng = StdRng::seed_from_u64(settings.seed);
/// let raster = generate_pattern(&RecoilParameters::default(), &settings, &mut rng);
///
/// // The first marker of every walk sits on the center.
/// assert_eq!(raster.get(256, 256), Some([255, 0, 0, 255]));
/// ```
pub fn generate_pattern<R: Rng + ?Sized>(
    params: &RecoilParameters,
    settings: &PreviewSettings,
    rng: &mut R,
) -> PreviewRaster {
    let mut raster = PreviewRaster::new(settings.width, settings.height);
    if settings.width == 0 || settings.height == 0 {
        return raster;
    }

    let center = Vec2::new(settings.width as f32, settings.height as f32) * 0.5;
    let max = Vec2::new((settings.width - 1) as f32, (settings.height - 1) as f32);
    let shots = settings.shots_per_iteration;

    for _ in 0..settings.iterations {
        let mut position = center;
        for shot in 0..shots {
            raster.fill_disc(
                round_to_pixel(position.x),
                round_to_pixel(position.y),
                settings.marker_radius,
                gradient_color(shot, shots),
            );

            let vertical = sample_axis(&params.vertical, rng);
            let horizontal = sample_axis(&params.horizontal, rng);
            position.x += horizontal * PREVIEW_STEP_SCALE;
            position.y -= vertical * PREVIEW_STEP_SCALE;
            position = position.clamp(Vec2::ZERO, max);
        }
    }

    raster
}

/// Same output distribution as [`generate_pattern`], advancing four walks at
/// once in SIMD-friendly lanes.
///
/// Random draws happen in a different order, so a given seed produces a
/// different (equally valid) picture than the scalar generator.
pub fn generate_pattern_batched<R: Rng + ?Sized>(
    params: &RecoilParameters,
    settings: &PreviewSettings,
    rng: &mut R,
) -> PreviewRaster {
    let mut raster = PreviewRaster::new(settings.width, settings.height);
    if settings.width == 0 || settings.height == 0 {
        return raster;
    }

    let center_x = settings.width as f32 * 0.5;
    let center_y = settings.height as f32 * 0.5;
    let max_x = Vec4::splat((settings.width - 1) as f32);
    let max_y = Vec4::splat((settings.height - 1) as f32);
    let shots = settings.shots_per_iteration;

    let mut remaining = settings.iterations as usize;
    while remaining > 0 {
        let active = remaining.min(LANES);
        remaining -= active;

        let mut xs = Vec4::splat(center_x);
        let mut ys = Vec4::splat(center_y);

        for shot in 0..shots {
            let color = gradient_color(shot, shots);
            let (lane_x, lane_y) = (xs.to_array(), ys.to_array());
            for lane in 0..active {
                raster.fill_disc(
                    round_to_pixel(lane_x[lane]),
                    round_to_pixel(lane_y[lane]),
                    settings.marker_radius,
                    color,
                );
            }

            // Inactive lanes keep walking with zero steps.
            let mut vertical = [0.0; LANES];
            let mut horizontal = [0.0; LANES];
            for lane in 0..active {
                vertical[lane] = sample_axis(&params.vertical, rng);
                horizontal[lane] = sample_axis(&params.horizontal, rng);
            }

            xs = (xs + Vec4::from_array(horizontal) * PREVIEW_STEP_SCALE).clamp(Vec4::ZERO, max_x);
            ys = (ys - Vec4::from_array(vertical) * PREVIEW_STEP_SCALE).clamp(Vec4::ZERO, max_y);
        }
    }

    raster
}

fn round_to_pixel(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(feature = "preview")]
pub use self::ecs::*;

#[cfg(feature = "preview")]
mod ecs {
    use bevy::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::{generate_pattern, PreviewSettings};
    use crate::components::RecoilParameters;

    /// Keeps a preview texture of the entity's [`RecoilParameters`] up to date.
    ///
    /// The image is regenerated whenever the parameters or these settings
    /// change; read `image` to show it in UI.
    #[derive(Component, Reflect, Clone, Debug, Default)]
    #[reflect(Component)]
    pub struct RecoilPreview {
        pub settings: PreviewSettings,
        /// Generated texture; empty until the first rebuild
        pub image: Handle<Image>,
    }

    impl RecoilPreview {
        pub fn new(settings: PreviewSettings) -> Self {
            Self {
                settings,
                image: Handle::default(),
            }
        }
    }

    /// Regenerate preview textures whose inputs changed.
    pub fn rebuild_recoil_previews(
        mut images: ResMut<Assets<Image>>,
        mut query: Query<
            (Entity, &RecoilParameters, &mut RecoilPreview),
            Or<(Changed<RecoilParameters>, Changed<RecoilPreview>)>,
        >,
    ) {
        for (entity, params, mut preview) in query.iter_mut() {
            let mut rng = StdRng::seed_from_u64(preview.settings.seed);
            let raster = generate_pattern(params, &preview.settings, &mut rng);

            // Storing the handle must not count as a settings change.
            let preview = preview.bypass_change_detection();
            if images.get(&preview.image).is_some() {
                let _ = images.insert(&preview.image, raster.to_image());
            } else {
                preview.image = images.add(raster.to_image());
            }

            debug!(
                "Rebuilt recoil preview for {} ({} marked pixels)",
                entity,
                raster.marked_pixels()
            );
        }
    }
}
