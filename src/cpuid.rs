use crate::schema::CpuRegister;

/// Source of raw CPUID register values.
pub(crate) trait CpuIdProvider {
    fn cpuid(&self, leaf: u32, sub_leaf: u32) -> CpuIdRegisters;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CpuIdRegisters {
    /// EAX register.
    pub eax: u32,
    /// EBX register.
    pub ebx: u32,
    /// ECX register.
    pub ecx: u32,
    /// EDX register.
    pub edx: u32,
}

impl CpuIdRegisters {
    /// Returns the value of a single register.
    pub fn get(&self, register: CpuRegister) -> u32 {
        match register {
            CpuRegister::Eax => self.eax,
            CpuRegister::Ebx => self.ebx,
            CpuRegister::Ecx => self.ecx,
            CpuRegister::Edx => self.edx,
        }
    }
}

#[cfg(target_arch = "x86_64")]
impl From<std::arch::x86_64::CpuidResult> for CpuIdRegisters {
    fn from(value: std::arch::x86_64::CpuidResult) -> Self {
        Self {
            eax: value.eax,
            ebx: value.ebx,
            ecx: value.ecx,
            edx: value.edx,
        }
    }
}

#[cfg(target_arch = "x86")]
impl From<std::arch::x86::CpuidResult> for CpuIdRegisters {
    fn from(value: std::arch::x86::CpuidResult) -> Self {
        Self {
            eax: value.eax,
            ebx: value.ebx,
            ecx: value.ecx,
            edx: value.edx,
        }
    }
}

/// Default implementation of the `CpuIdProvider` trait. This implementation uses the
/// [`__cpuid_count`] intrinsic to read actual CPUID information.
///
/// On architectures without a CPUID instruction every leaf reads as all zeroes, which
/// makes the host look like it supports no features at all.
#[derive(Default)]
pub(crate) struct MachineCpuIdProvider {}

impl CpuIdProvider for MachineCpuIdProvider {
    #[allow(unused_variables, unused_unsafe)]
    fn cpuid(&self, leaf: u32, sub_leaf: u32) -> CpuIdRegisters {
        cfg_if::cfg_if! {
            if #[cfg(target_arch = "x86_64")] {
                unsafe { std::arch::x86_64::__cpuid_count(leaf, sub_leaf).into() }
            } else if #[cfg(target_arch = "x86")] {
                unsafe { std::arch::x86::__cpuid_count(leaf, sub_leaf).into() }
            } else {
                CpuIdRegisters::default()
            }
        }
    }
}

/// Canned CPUID answers for tests. Leaves that were never set read as zero.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct FakeCpuIdProvider {
    leaves: std::collections::HashMap<(u32, u32), CpuIdRegisters>,
}

#[cfg(test)]
impl FakeCpuIdProvider {
    pub fn with_leaf(mut self, leaf: u32, sub_leaf: u32, registers: CpuIdRegisters) -> Self {
        self.leaves.insert((leaf, sub_leaf), registers);
        self
    }
}

#[cfg(test)]
impl CpuIdProvider for FakeCpuIdProvider {
    fn cpuid(&self, leaf: u32, sub_leaf: u32) -> CpuIdRegisters {
        self.leaves
            .get(&(leaf, sub_leaf))
            .copied()
            .unwrap_or_default()
    }
}
