use kdispatch_abi::{Device, Domain};

/// Built-in backends per (domain, device), highest priority first.
pub(crate) static BACKENDS: &[(Domain, Device, &[&str])] = &[
	(Domain::Blas, Device::X86Cpu, &["mklcpu", "netlib", "generic"]),
	(Domain::Blas, Device::Aarch64Cpu, &["armpl", "netlib", "generic"]),
	(Domain::Blas, Device::IntelGpu, &["mklgpu", "generic"]),
	(Domain::Blas, Device::NvidiaGpu, &["cublas", "generic"]),
	(Domain::Blas, Device::AmdGpu, &["rocblas", "generic"]),
	(Domain::Blas, Device::GenericDevice, &["generic"]),
	(Domain::Dft, Device::X86Cpu, &["mklcpu", "portfft"]),
	(Domain::Dft, Device::Aarch64Cpu, &["armpl", "portfft"]),
	(Domain::Dft, Device::IntelGpu, &["mklgpu", "portfft"]),
	(Domain::Dft, Device::NvidiaGpu, &["cufft", "portfft"]),
	(Domain::Dft, Device::AmdGpu, &["rocfft", "portfft"]),
	(Domain::Dft, Device::GenericDevice, &["portfft"]),
	(Domain::Lapack, Device::X86Cpu, &["mklcpu"]),
	(Domain::Lapack, Device::Aarch64Cpu, &["armpl"]),
	(Domain::Lapack, Device::IntelGpu, &["mklgpu"]),
	(Domain::Lapack, Device::NvidiaGpu, &["cusolver"]),
	(Domain::Lapack, Device::AmdGpu, &["rocsolver"]),
	(Domain::Rng, Device::X86Cpu, &["mklcpu"]),
	(Domain::Rng, Device::Aarch64Cpu, &["armpl"]),
	(Domain::Rng, Device::IntelGpu, &["mklgpu"]),
	(Domain::Rng, Device::NvidiaGpu, &["curand"]),
	(Domain::Rng, Device::AmdGpu, &["rocrand"]),
	(Domain::SparseBlas, Device::X86Cpu, &["mklcpu"]),
	(Domain::SparseBlas, Device::IntelGpu, &["mklgpu"]),
	(Domain::SparseBlas, Device::NvidiaGpu, &["cusparse"]),
	(Domain::SparseBlas, Device::AmdGpu, &["rocsparse"]),
];

/// Returns the platform-specific library file name for a backend.
pub fn library_file_name(domain: Domain, backend: &str) -> String {
	let stem = format!("kdispatch_{}_{backend}", domain.as_str());
	#[cfg(target_os = "macos")]
	{
		format!("lib{stem}.dylib")
	}
	#[cfg(target_os = "windows")]
	{
		format!("{stem}.dll")
	}
	#[cfg(not(any(target_os = "macos", target_os = "windows")))]
	{
		format!("lib{stem}.so")
	}
}
