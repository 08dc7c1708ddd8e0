//! Sampler descriptor shim

use crate::capability::{fallback, skipped_write, CapabilityQuery, OptionalProperty};
use crate::types::CompareFunction;

/// Driver-side sampler descriptor. Native accessors are only called once
/// `responds_to(OptionalProperty::SamplerCompareFunction)` returned true.
/// The setter returns `false`, leaving the object unchanged, when it cannot
/// represent the value.
pub trait SamplerDescriptorObject: CapabilityQuery {
    fn compare_function(&self) -> CompareFunction;
    fn set_compare_function(&mut self, function: CompareFunction) -> bool;
}

pub trait SamplerDescriptorShim {
    /// Native compare function, or `CompareFunction::Always` when unsupported.
    fn compare_function_or_default(&self) -> CompareFunction;

    /// Returns whether the value reached the native property.
    fn try_set_compare_function(&mut self, function: CompareFunction) -> bool;
}

impl<T: SamplerDescriptorObject + ?Sized> SamplerDescriptorShim for T {
    fn compare_function_or_default(&self) -> CompareFunction {
        if self.responds_to(OptionalProperty::SamplerCompareFunction) {
            self.compare_function()
        } else {
            fallback(OptionalProperty::SamplerCompareFunction, CompareFunction::Always)
        }
    }

    fn try_set_compare_function(&mut self, function: CompareFunction) -> bool {
        if !self.responds_to(OptionalProperty::SamplerCompareFunction) {
            return skipped_write(OptionalProperty::SamplerCompareFunction);
        }
        self.set_compare_function(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockSampler {
        supported: bool,
        function: CompareFunction,
    }

    impl CapabilityQuery for MockSampler {
        fn responds_to(&self, property: OptionalProperty) -> bool {
            self.supported && property == OptionalProperty::SamplerCompareFunction
        }
    }

    impl SamplerDescriptorObject for MockSampler {
        fn compare_function(&self) -> CompareFunction {
            self.function
        }

        fn set_compare_function(&mut self, function: CompareFunction) -> bool {
            self.function = function;
            true
        }
    }

    #[test]
    fn supported_compare_function_round_trips() {
        let mut sampler = MockSampler { supported: true, function: CompareFunction::Never };
        assert_eq!(sampler.compare_function_or_default(), CompareFunction::Never);

        assert!(sampler.try_set_compare_function(CompareFunction::LessEqual));
        assert_eq!(sampler.compare_function_or_default(), CompareFunction::LessEqual);
    }

    #[test]
    fn unsupported_compare_function_reads_always() {
        let mut sampler = MockSampler { supported: false, function: CompareFunction::Never };
        assert_eq!(sampler.compare_function_or_default(), CompareFunction::Always);

        assert!(!sampler.try_set_compare_function(CompareFunction::Greater));
        assert_eq!(sampler.compare_function_or_default(), CompareFunction::Always);
        assert_eq!(sampler.function, CompareFunction::Never);
    }
}
