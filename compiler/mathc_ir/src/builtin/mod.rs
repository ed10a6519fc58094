//! Builtin function catalogue.
//!
//! Builtins are identified once, during resolution, and carried on call
//! nodes as a `Builtin` tag. Lowering dispatches on the tag and never
//! compares callee text.

/// How a builtin is lowered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinKind {
    /// `len(a)` reads the length companion.
    Length,
    /// `input()` picks a reader by the call's type.
    Input,
    /// `print`/`println` pick a printer by the argument's type.
    Print { newline: bool },
    /// Reads an array and its length: `mathc_sum(a, a__len)`.
    Reduction,
    /// Mutates an array in place: `mathc_sort(a, a__len)`.
    InPlace,
    /// Shrinks the length companion: `mathc_pop(a, &a__len)`.
    Pop,
    /// `range(...)`, lowered as a loop when it is a `for` iterable.
    Range,
    /// Maps straight onto a C library function of the same name.
    Passthrough,
    /// Calls the `mathc_` runtime helper with the arguments unchanged.
    Runtime,
    /// Array search: `mathc_find(a, a__len, v)`.
    Search,
    /// Set size: `mathc_cardinality(s, s__len)`.
    Cardinality,
}

macro_rules! builtins {
    ($($variant:ident => $name:literal, $kind:expr;)*) => {
        /// A function provided by the language rather than the program.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        pub enum Builtin {
            $($variant,)*
        }

        impl Builtin {
            /// Every builtin, in catalogue order.
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant,)*];

            /// Source-level name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Builtin::$variant => $name,)*
                }
            }

            pub const fn kind(self) -> BuiltinKind {
                match self {
                    $(Builtin::$variant => $kind,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Builtin> {
                match name {
                    $($name => Some(Builtin::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

builtins! {
    Len => "len", BuiltinKind::Length;
    Input => "input", BuiltinKind::Input;
    Print => "print", BuiltinKind::Print { newline: false };
    Println => "println", BuiltinKind::Print { newline: true };
    Range => "range", BuiltinKind::Range;

    Sum => "sum", BuiltinKind::Reduction;
    Mean => "mean", BuiltinKind::Reduction;
    Prod => "prod", BuiltinKind::Reduction;
    Std => "std", BuiltinKind::Reduction;
    Variance => "variance", BuiltinKind::Reduction;
    MinElement => "min_element", BuiltinKind::Reduction;
    MaxElement => "max_element", BuiltinKind::Reduction;
    Sort => "sort", BuiltinKind::InPlace;
    Reverse => "reverse", BuiltinKind::InPlace;
    Pop => "pop", BuiltinKind::Pop;
    Find => "find", BuiltinKind::Search;
    Count => "count", BuiltinKind::Search;
    Cardinality => "cardinality", BuiltinKind::Cardinality;

    Sqrt => "sqrt", BuiltinKind::Passthrough;
    Sin => "sin", BuiltinKind::Passthrough;
    Cos => "cos", BuiltinKind::Passthrough;
    Tan => "tan", BuiltinKind::Passthrough;
    Exp => "exp", BuiltinKind::Passthrough;
    Log => "log", BuiltinKind::Passthrough;
    Log10 => "log10", BuiltinKind::Passthrough;
    Log2 => "log2", BuiltinKind::Passthrough;
    Asin => "asin", BuiltinKind::Passthrough;
    Acos => "acos", BuiltinKind::Passthrough;
    Atan => "atan", BuiltinKind::Passthrough;
    Atan2 => "atan2", BuiltinKind::Passthrough;
    Sinh => "sinh", BuiltinKind::Passthrough;
    Cosh => "cosh", BuiltinKind::Passthrough;
    Tanh => "tanh", BuiltinKind::Passthrough;
    Floor => "floor", BuiltinKind::Passthrough;
    Ceil => "ceil", BuiltinKind::Passthrough;
    Round => "round", BuiltinKind::Passthrough;
    Trunc => "trunc", BuiltinKind::Passthrough;
    Pow => "pow", BuiltinKind::Passthrough;
    Fmod => "fmod", BuiltinKind::Passthrough;
    Fabs => "fabs", BuiltinKind::Passthrough;
    Abs => "abs", BuiltinKind::Passthrough;
    Rand => "rand", BuiltinKind::Passthrough;
    Srand => "srand", BuiltinKind::Passthrough;
    Max => "max", BuiltinKind::Passthrough;
    Min => "min", BuiltinKind::Passthrough;

    Factorial => "factorial", BuiltinKind::Runtime;
    Gcd => "gcd", BuiltinKind::Runtime;
    Lcm => "lcm", BuiltinKind::Runtime;
    IsPrime => "isprime", BuiltinKind::Runtime;
    Combinations => "combinations", BuiltinKind::Runtime;
    Permutations => "permutations", BuiltinKind::Runtime;
    Real => "real", BuiltinKind::Runtime;
    Imag => "imag", BuiltinKind::Runtime;
    Conjugate => "conjugate", BuiltinKind::Runtime;
    Phase => "phase", BuiltinKind::Runtime;
    Magnitude => "magnitude", BuiltinKind::Runtime;
}
