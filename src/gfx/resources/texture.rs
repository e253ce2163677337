//! Texture resources: decoding, upload, placeholders, and the
//! load-once cache.
//!
//! Bundles the texture, view, and sampler needed for binding. Decode
//! failures are non-fatal: callers that can tolerate a bad texture get a
//! checkerboard placeholder instead of an uninitialized binding.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use image::GenericImageView;

use crate::error::AssetError;

/// GPU texture resource containing texture, view, and sampler.
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the renderer.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates an offscreen color target the post-processing pass samples.
    pub fn create_render_target(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Decodes an image file and uploads it as a 2D texture.
    ///
    /// 1-channel images become `R8Unorm`, 3-channel images are expanded to
    /// RGBA (wgpu has no packed 24-bit format), 4-channel images upload as
    /// `Rgba8UnormSrgb`. Textures with alpha clamp to edge so transparent
    /// borders do not bleed; all others repeat.
    pub fn from_file(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Self, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let img = image::open(path).map_err(|source| AssetError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = img.dimensions();
        let channels = img.color().channel_count();

        let (format, data, bytes_per_row, has_alpha) = match channels {
            1 => (
                wgpu::TextureFormat::R8Unorm,
                img.to_luma8().into_raw(),
                width,
                false,
            ),
            3 => (
                wgpu::TextureFormat::Rgba8UnormSrgb,
                img.to_rgba8().into_raw(),
                4 * width,
                false,
            ),
            4 => (
                wgpu::TextureFormat::Rgba8UnormSrgb,
                img.to_rgba8().into_raw(),
                4 * width,
                true,
            ),
            n => {
                return Err(AssetError::UnsupportedChannelCount {
                    path: path.to_path_buf(),
                    channels: n,
                })
            }
        };

        let label = path.display().to_string();
        Ok(Self::from_raw_pixels(
            device,
            queue,
            &data,
            width,
            height,
            format,
            bytes_per_row,
            has_alpha,
            &label,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn from_raw_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        bytes_per_row: u32,
        clamp: bool,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let address_mode = if clamp {
            wgpu::AddressMode::ClampToEdge
        } else {
            wgpu::AddressMode::Repeat
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// 8x8 magenta/black checkerboard substituted for failed loads.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        const SIZE: u32 = 8;
        let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
        for y in 0..SIZE {
            for x in 0..SIZE {
                if (x + y) % 2 == 0 {
                    data.extend_from_slice(&[255, 0, 255, 255]);
                } else {
                    data.extend_from_slice(&[0, 0, 0, 255]);
                }
            }
        }
        Self::from_raw_pixels(
            device,
            queue,
            &data,
            SIZE,
            SIZE,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            4 * SIZE,
            false,
            "placeholder",
        )
    }

    /// Solid 1x1 white texture bound where a mesh has no map for a role.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_raw_pixels(
            device,
            queue,
            &[255, 255, 255, 255],
            1,
            1,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            4,
            false,
            "white",
        )
    }

    /// Loads a texture, falling back to the checkerboard placeholder on
    /// any failure. The failure is logged, never silently dropped.
    pub fn from_file_or_placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Self {
        match Self::from_file(device, queue, path) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("texture load failed, using placeholder: {}", err);
                Self::placeholder(device, queue)
            }
        }
    }

    /// Decodes six face images into a cube texture.
    ///
    /// Face order follows the wgpu array-layer convention:
    /// +X, -X, +Y, -Y, +Z, -Z. All faces must share dimensions.
    pub fn cubemap_from_files(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[PathBuf; 6],
        label: &str,
    ) -> Result<Self, AssetError> {
        let mut decoded = Vec::with_capacity(6);
        for path in faces {
            if !path.exists() {
                return Err(AssetError::NotFound { path: path.clone() });
            }
            let img = image::open(path).map_err(|source| AssetError::ImageDecode {
                path: path.clone(),
                source,
            })?;
            decoded.push(img.to_rgba8());
        }

        let (width, height) = decoded[0].dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 6,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in decoded.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d {
                        x: 0,
                        y: 0,
                        z: layer as u32,
                    },
                    aspect: wgpu::TextureAspect::All,
                },
                face,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

/// Load-once cache keyed by canonical path.
///
/// Guarantees that one file decodes and uploads exactly once no matter how
/// many meshes reference it; every reference resolves to the same handle.
pub struct PathCache<T> {
    entries: HashMap<PathBuf, Arc<T>>,
}

impl<T> PathCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached value for `path`, invoking `load` only on the
    /// first request for that path.
    pub fn get_or_insert_with(&mut self, path: &Path, load: impl FnOnce() -> T) -> Arc<T> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries
            .entry(key)
            .or_insert_with(|| Arc::new(load()))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PathCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Texture cache used during model loading.
pub type TextureCache = PathCache<TextureResource>;

impl TextureCache {
    /// Loads a texture through the cache, substituting a placeholder on
    /// failure. The placeholder is cached under the same path so repeated
    /// references do not retry the decode each frame.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Arc<TextureResource> {
        self.get_or_insert_with(path, || {
            TextureResource::from_file_or_placeholder(device, queue, path)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_loads_each_path_once() {
        let mut cache: PathCache<u32> = PathCache::new();
        let mut loads = 0;

        let a = cache.get_or_insert_with(Path::new("textures/wall.png"), || {
            loads += 1;
            7
        });
        let b = cache.get_or_insert_with(Path::new("textures/wall.png"), || {
            loads += 1;
            8
        });

        assert_eq!(loads, 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_distinguishes_paths() {
        let mut cache: PathCache<u32> = PathCache::new();
        cache.get_or_insert_with(Path::new("a.png"), || 1);
        cache.get_or_insert_with(Path::new("b.png"), || 2);
        assert_eq!(cache.len(), 2);
    }
}
