// gpu/device.rs — wgpu device abstraction.
//
// Responsibilities:
//   - Enumerate Vulkan adapters and prefer real hardware over software
//     rasterizers.
//   - Expose `WorkgroupSize` — the 2D compute tile, validated against the
//     device's limits. 8×8 is the default; tile size is a scheduling
//     detail and never observable in the output.
//   - Compute dispatch dimensions (ceiling division) for a given frame.
//
// ADAPTER SELECTION:
// wgpu's default `request_adapter` power-preference heuristics may grab
// llvmpipe/softpipe on WSL2, where the software renderer appears as a
// valid Vulkan device. We enumerate explicitly and prefer hardware
// device types, falling back to whatever exists so a CI box without a
// GPU can still run the ignored integration tests under a software
// driver.

use std::fmt;

/// A workgroup size configuration for 2D compute dispatches.
///
/// The default is 8×8 (64 invocations per tile), matching the dispatch
/// granularity the filter was tuned for. Override via
/// [`GpuDevice::set_workgroup_size`], which validates the product
/// against the device's invocation limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkgroupSize {
    pub x: u32,
    pub y: u32,
}

impl WorkgroupSize {
    pub const DEFAULT: WorkgroupSize = WorkgroupSize { x: 8, y: 8 };

    /// Total invocations per workgroup (x * y).
    pub fn total(&self) -> u32 {
        self.x * self.y
    }
}

impl fmt::Display for WorkgroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{} ({} invocations)", self.x, self.y, self.total())
    }
}

/// Cached adapter information for logging and debugging.
#[derive(Debug, Clone)]
pub struct AdapterInfo {
    pub name: String,
    pub vendor: u32,
    pub device: u32,
    pub device_type: wgpu::DeviceType,
    pub backend: wgpu::Backend,
}

impl fmt::Display for AdapterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, {:?})",
            self.name, self.backend, self.device_type
        )
    }
}

/// The core GPU context: device, queue and active workgroup size.
///
/// Create one per process and keep it for the lifetime of the stream —
/// device initialization is expensive, per-frame work is not.
///
/// # Field drop order
/// Rust drops struct fields in declaration order. `_instance` is declared
/// last so the `wgpu::Instance` outlives `device` and `queue`; some
/// Vulkan layers (dzn on WSL2) crash when the instance dies first.
pub struct GpuDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub adapter_info: AdapterInfo,
    pub workgroup_size: WorkgroupSize,
    /// Keeps the `wgpu::Instance` alive until `device` and `queue` are
    /// dropped. Never accessed directly.
    _instance: wgpu::Instance,
}

impl GpuDevice {
    /// Create a `GpuDevice` on the best available Vulkan adapter.
    ///
    /// # Errors
    /// Returns `Err` if no adapter is found or the device request fails.
    pub fn new() -> Result<Self, GpuError> {
        pollster::block_on(Self::init_async())
    }

    async fn init_async() -> Result<Self, GpuError> {
        // Validation layer in debug builds for shader error feedback;
        // non-conformant adapters (dzn on WSL2) allowed in both so a
        // D3D12-backed Vulkan still enumerates.
        let flags = if cfg!(debug_assertions) {
            wgpu::InstanceFlags::VALIDATION
                | wgpu::InstanceFlags::ALLOW_UNDERLYING_NONCOMPLIANT_ADAPTER
        } else {
            wgpu::InstanceFlags::ALLOW_UNDERLYING_NONCOMPLIANT_ADAPTER
        };

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::VULKAN,
            flags,
            ..Default::default()
        });

        let all_adapters: Vec<wgpu::Adapter> = instance
            .enumerate_adapters(wgpu::Backends::VULKAN)
            .into_iter()
            .collect();

        if all_adapters.is_empty() {
            return Err(GpuError::NoSuitableAdapter);
        }

        for a in &all_adapters {
            let info = a.get_info();
            eprintln!(
                "[edgeline] Vulkan adapter: {} ({:?}, {:?})",
                info.name, info.backend, info.device_type
            );
        }

        // Tier 1: hardware (or hardware-backed) adapters. Tier 2: anything,
        // including llvmpipe — slow but correct, and the only option on a
        // GPU-less box.
        let adapter = all_adapters
            .into_iter()
            .find(|a| {
                matches!(
                    a.get_info().device_type,
                    wgpu::DeviceType::DiscreteGpu
                        | wgpu::DeviceType::IntegratedGpu
                        | wgpu::DeviceType::VirtualGpu
                        | wgpu::DeviceType::Other
                )
            })
            .or_else(|| {
                instance
                    .enumerate_adapters(wgpu::Backends::VULKAN)
                    .into_iter()
                    .next()
            })
            .ok_or(GpuError::NoSuitableAdapter)?;

        let raw_info = adapter.get_info();
        let adapter_info = AdapterInfo {
            name: raw_info.name.clone(),
            vendor: raw_info.vendor,
            device: raw_info.device,
            device_type: raw_info.device_type,
            backend: raw_info.backend,
        };
        eprintln!("[edgeline] using adapter: {adapter_info}");

        let (device, queue): (wgpu::Device, wgpu::Queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("edgeline"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(GpuError::DeviceRequest)?;

        Ok(GpuDevice {
            device,
            queue,
            adapter_info,
            workgroup_size: WorkgroupSize::DEFAULT,
            _instance: instance,
        })
    }

    /// Override the default workgroup size.
    ///
    /// Returns `Err` if the total invocation count (x * y) exceeds the
    /// device's `max_compute_invocations_per_workgroup`.
    pub fn set_workgroup_size(&mut self, x: u32, y: u32) -> Result<(), GpuError> {
        let total = x * y;
        let max = self.device.limits().max_compute_invocations_per_workgroup;
        if x == 0 || y == 0 || total > max {
            return Err(GpuError::WorkgroupTooLarge { total, max });
        }
        self.workgroup_size = WorkgroupSize { x, y };
        Ok(())
    }

    /// Compute the dispatch dimensions needed to cover a frame of the
    /// given size with the active workgroup size.
    ///
    /// Ceiling division: every coordinate in [0, W)×[0, H) is covered
    /// even when the frame dimensions are not tile multiples. The shader
    /// guards the overhang:
    /// ```wgsl
    /// if gid.x >= width || gid.y >= height { return; }
    /// ```
    pub fn dispatch_size(&self, frame_w: u32, frame_h: u32) -> (u32, u32) {
        let dx = (frame_w + self.workgroup_size.x - 1) / self.workgroup_size.x;
        let dy = (frame_h + self.workgroup_size.y - 1) / self.workgroup_size.y;
        (dx, dy)
    }
}

impl fmt::Display for GpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GpuDevice {{ adapter: {}, workgroup: {} }}",
            self.adapter_info, self.workgroup_size
        )
    }
}

// ============================================================
// Error type
// ============================================================

/// Errors from GPU device initialization and configuration.
#[derive(Debug)]
pub enum GpuError {
    /// No Vulkan adapter found at all. Check that Vulkan is installed and
    /// `vulkaninfo` lists at least one device.
    NoSuitableAdapter,
    /// wgpu device request failed (driver issue, unsupported limits, etc.).
    DeviceRequest(wgpu::RequestDeviceError),
    /// Requested workgroup size is zero or exceeds the device's
    /// invocation limit.
    WorkgroupTooLarge { total: u32, max: u32 },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoSuitableAdapter => {
                write!(f, "no Vulkan adapter found (is Vulkan installed?)")
            }
            GpuError::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            GpuError::WorkgroupTooLarge { total, max } => write!(
                f,
                "workgroup size {total} exceeds device limit of {max} invocations"
            ),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::DeviceRequest(e) => Some(e),
            _ => None,
        }
    }
}

// ============================================================
// Tests
// ============================================================
