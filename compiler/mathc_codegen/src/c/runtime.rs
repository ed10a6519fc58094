//! C Runtime Library
//!
//! Every generated program carries its own copy of the runtime: range
//! iteration, integer floor division, array statistics, number theory,
//! complex helpers, integer sets and the print/input family. Helper loops
//! are written with labels and `goto` like the lowered program itself.
//! Runtime labels are named `L_<helper>_<part>` so they never collide with
//! the numbered `L{n}` labels of user code.

use crate::context::CodegenContext;

/// C runtime code generator.
pub struct CRuntime;

const BANNER: &str =
    "/* ========================================================================== */";

const HEADERS: &[&str] = &[
    "stdio.h",
    "stdlib.h",
    "string.h",
    "stdbool.h",
    "math.h",
    "complex.h",
];

const CONSTANTS: &str = "\
#ifndef PI
#define PI 3.14159265358979323846
#endif
#ifndef E
#define E 2.71828182845904523536
#endif
";

const RANGE: &str = "\
typedef struct { int start; int end; int step; } range_t;
static inline range_t make_range(int s, int e, int st) { range_t r = {s, e, st}; return r; }
static inline int range_has_next(range_t* r, int i) { return r->step > 0 ? i < r->end : i > r->end; }
";

const ARITHMETIC: &str = "\
static inline int mathc_floor_div(int a, int b) {
    if (b == 0) { fprintf(stderr, \"Error: division by zero\\n\"); exit(1); }
    int q = a / b;
    int r = a % b;
    if ((r != 0) && ((r > 0) != (b > 0))) q--;
    return q;
}
static inline double max(double a, double b) { return (a > b) ? a : b; }
static inline double min(double a, double b) { return (a < b) ? a : b; }
";

const STATISTICS: &str = "\
static inline double mathc_sum(int* arr, int len) {
    double s = 0.0; int i = 0; goto L_sum_check;
L_sum_body: s += arr[i]; i++;
L_sum_check: if (i < len) goto L_sum_body;
    return s;
}
static inline double mathc_mean(int* arr, int len) {
    if (len == 0) return 0.0;
    return mathc_sum(arr, len) / len;
}
static inline double mathc_prod(int* arr, int len) {
    double p = 1.0; int i = 0; goto L_prod_check;
L_prod_body: p *= arr[i]; i++;
L_prod_check: if (i < len) goto L_prod_body;
    return p;
}
static inline double mathc_variance(int* arr, int len) {
    if (len == 0) return 0.0;
    double m = mathc_mean(arr, len); double var = 0.0; int i = 0; goto L_var_check;
L_var_body: { double diff = arr[i] - m; var += diff * diff; i++; }
L_var_check: if (i < len) goto L_var_body;
    return var / len;
}
static inline double mathc_std(int* arr, int len) { return sqrt(mathc_variance(arr, len)); }
static inline void mathc_sort(int* arr, int len) {
    int i = 0; goto L_sort_i_check;
L_sort_i_body: { int j = i + 1; goto L_sort_j_check;
L_sort_j_body: if (arr[j] < arr[i]) { int tmp = arr[i]; arr[i] = arr[j]; arr[j] = tmp; } j++;
L_sort_j_check: if (j < len) goto L_sort_j_body;
    i++; }
L_sort_i_check: if (i < len - 1) goto L_sort_i_body;
}
static inline void mathc_reverse(int* arr, int len) {
    int i = 0; int j = len - 1; goto L_rev_check;
L_rev_body: { int tmp = arr[i]; arr[i] = arr[j]; arr[j] = tmp; i++; j--; }
L_rev_check: if (i < j) goto L_rev_body;
}
static inline int mathc_pop(int* arr, int* len_ptr) {
    if (*len_ptr == 0) return 0;
    (*len_ptr)--;
    return arr[*len_ptr];
}
static inline void mathc_remove_at(void* arr, int* len_ptr, int index, size_t size) {
    if (index < 0 || index >= *len_ptr) return;
    char* base = (char*)arr;
    memmove(base + (size_t)index * size, base + (size_t)(index + 1) * size,
            size * (size_t)(*len_ptr - index - 1));
    (*len_ptr)--;
}
static inline void mathc_free_rows(void* rows, int count) {
    void** table = (void**)rows;
    int i = 0; goto L_free_rows_check;
L_free_rows_body: free(table[i]); i++;
L_free_rows_check: if (i < count) goto L_free_rows_body;
    free(table);
}
";

const NUMBER_THEORY: &str = "\
static inline int mathc_factorial(int n) {
    if (n < 0) return 0;
    if (n <= 1) return 1;
    int result = 1; int i = 2; goto L_fact_check;
L_fact_body: result *= i; i++;
L_fact_check: if (i <= n) goto L_fact_body;
    return result;
}
static inline int mathc_gcd(int a, int b) {
    if (a < 0) a = -a;
    if (b < 0) b = -b;
    goto L_gcd_check;
L_gcd_body: { int temp = b; b = a % b; a = temp; }
L_gcd_check: if (b != 0) goto L_gcd_body;
    return a;
}
static inline int mathc_lcm(int a, int b) {
    if (a == 0 || b == 0) return 0;
    int g = mathc_gcd(a, b);
    if (a < 0) a = -a;
    if (b < 0) b = -b;
    return (a / g) * b;
}
static inline int mathc_isprime(int n) {
    if (n < 2) return 0;
    if (n == 2) return 1;
    if (n % 2 == 0) return 0;
    int i = 3; int limit = (int)sqrt(n); goto L_prime_check;
L_prime_body: if (n % i == 0) return 0; i += 2;
L_prime_check: if (i <= limit) goto L_prime_body;
    return 1;
}
static inline int mathc_combinations(int n, int k) {
    if (k > n || k < 0) return 0;
    if (k == 0 || k == n) return 1;
    if (k > n - k) k = n - k;
    int result = 1; int i = 0; goto L_comb_check;
L_comb_body: result = result * (n - i) / (i + 1); i++;
L_comb_check: if (i < k) goto L_comb_body;
    return result;
}
static inline int mathc_permutations(int n, int k) {
    if (k > n || k < 0) return 0;
    int result = 1; int i = 0; goto L_perm_check;
L_perm_body: result *= (n - i); i++;
L_perm_check: if (i < k) goto L_perm_body;
    return result;
}
";

const SEARCH: &str = "\
static inline int mathc_min_element(int* arr, int len) {
    if (len == 0) return 0;
    int min_val = arr[0]; int i = 1; goto L_minelem_check;
L_minelem_body: if (arr[i] < min_val) min_val = arr[i]; i++;
L_minelem_check: if (i < len) goto L_minelem_body;
    return min_val;
}
static inline int mathc_max_element(int* arr, int len) {
    if (len == 0) return 0;
    int max_val = arr[0]; int i = 1; goto L_maxelem_check;
L_maxelem_body: if (arr[i] > max_val) max_val = arr[i]; i++;
L_maxelem_check: if (i < len) goto L_maxelem_body;
    return max_val;
}
static inline int mathc_find(int* arr, int len, int val) {
    int i = 0; goto L_find_check;
L_find_body: if (arr[i] == val) return i; i++;
L_find_check: if (i < len) goto L_find_body;
    return -1;
}
static inline int mathc_count(int* arr, int len, int val) {
    int cnt = 0; int i = 0; goto L_count_check;
L_count_body: if (arr[i] == val) cnt++; i++;
L_count_check: if (i < len) goto L_count_body;
    return cnt;
}
";

const COMPLEX: &str = "\
static inline double complex mathc_sqrt_safe(double x) {
    if (x < 0) return csqrt(x);
    return sqrt(x) + 0.0 * I;
}
static inline double mathc_real(double complex z) { return creal(z); }
static inline double mathc_imag(double complex z) { return cimag(z); }
static inline double complex mathc_conjugate(double complex z) { return conj(z); }
static inline double mathc_phase(double complex z) { return carg(z); }
static inline double mathc_magnitude(double complex z) { return cabs(z); }
";

const SETS: &str = "\
static inline int mathc_cardinality(int* set, int len) { (void)set; return len; }
typedef struct { int* ptr; int len; } set_result_t;
static inline set_result_t set_union(int* a, int a_len, int* b, int b_len) {
    int* result = malloc(sizeof(int) * (a_len + b_len));
    int result_len = 0;
    int i = 0; goto L_u_copy_check;
L_u_copy_body: result[result_len++] = a[i]; i++;
L_u_copy_check: if (i < a_len) goto L_u_copy_body;
    i = 0; goto L_u_bcheck;
L_u_bbody: { int found = 0; int j = 0; goto L_u_bjcheck;
L_u_bjbody: if (b[i] == a[j]) { found = 1; goto L_u_bjend; } j++;
L_u_bjcheck: if (j < a_len) goto L_u_bjbody;
L_u_bjend: if (!found) { result[result_len++] = b[i]; } i++; }
L_u_bcheck: if (i < b_len) goto L_u_bbody;
    set_result_t r = {result, result_len};
    return r;
}
static inline set_result_t set_difference(int* a, int a_len, int* b, int b_len) {
    int* result = malloc(sizeof(int) * a_len);
    int result_len = 0;
    int i = 0; goto L_d_acheck;
L_d_abody: { int found = 0; int j = 0; goto L_d_bcheck;
L_d_bbody: if (a[i] == b[j]) { found = 1; goto L_d_bend; } j++;
L_d_bcheck: if (j < b_len) goto L_d_bbody;
L_d_bend: if (!found) { result[result_len++] = a[i]; } i++; }
L_d_acheck: if (i < a_len) goto L_d_abody;
    set_result_t r = {result, result_len};
    return r;
}
static inline int set_contains(int* set, int set_len, int element) {
    int i = 0; goto L_c_check;
L_c_body: if (set[i] == element) return 1; i++;
L_c_check: if (i < set_len) goto L_c_body;
    return 0;
}
static inline int set_is_subset(int* a, int a_len, int* b, int b_len) {
    int i = 0; goto L_s_check;
L_s_body: if (!set_contains(b, b_len, a[i])) return 0; i++;
L_s_check: if (i < a_len) goto L_s_body;
    return 1;
}
";

const PRINT: &str = "\
void mathc_print_int(int x) { printf(\"%d\", x); }
void mathc_print_float(double x) { printf(\"%g\", x); }
void mathc_print_string(char* x) { printf(\"%s\", x); }
void mathc_print_char(char x) { printf(\"%c\", x); }
void mathc_print_complex(double complex x) { printf(\"%g%+gi\", creal(x), cimag(x)); }
void mathc_println_int(int x) { printf(\"%d\\n\", x); }
void mathc_println_float(double x) { printf(\"%g\\n\", x); }
void mathc_println_string(char* x) { printf(\"%s\\n\", x); }
void mathc_println_char(char x) { printf(\"%c\\n\", x); }
void mathc_println_complex(double complex x) { printf(\"%g%+gi\\n\", creal(x), cimag(x)); }
void mathc_print_array(int* arr, int len) {
    printf(\"[\"); int i = 0; goto L_pa_check;
L_pa_body: if (i > 0) printf(\", \"); printf(\"%d\", arr[i]); i++;
L_pa_check: if (i < len) goto L_pa_body;
    printf(\"]\");
}
void mathc_println_array(int* arr, int len) {
    printf(\"[\"); int i = 0; goto L_pla_check;
L_pla_body: if (i > 0) printf(\", \"); printf(\"%d\", arr[i]); i++;
L_pla_check: if (i < len) goto L_pla_body;
    printf(\"]\\n\");
}
void mathc_print_set(int* set, int len) {
    printf(\"{\"); int i = 0; goto L_ps_check;
L_ps_body: if (i > 0) printf(\", \"); printf(\"%d\", set[i]); i++;
L_ps_check: if (i < len) goto L_ps_body;
    printf(\"}\");
}
void mathc_println_set(int* set, int len) {
    printf(\"{\"); int i = 0; goto L_pls_check;
L_pls_body: if (i > 0) printf(\", \"); printf(\"%d\", set[i]); i++;
L_pls_check: if (i < len) goto L_pls_body;
    printf(\"}\\n\");
}
";

const INPUT: &str = "\
int mathc_input_int(void) { int x = 0; if (scanf(\"%d\", &x) != 1) x = 0; return x; }
double mathc_input_float(void) { double x = 0.0; if (scanf(\"%lf\", &x) != 1) x = 0.0; return x; }
char* mathc_input_string(void) {
    char* s = malloc(256);
    if (fgets(s, 256, stdin)) { s[strcspn(s, \"\\n\")] = 0; } else { s[0] = 0; }
    return s;
}
char mathc_input_char(void) { char c = 0; if (scanf(\" %c\", &c) != 1) c = 0; return c; }
";

impl CRuntime {
    /// Emit the `#include` block. `time.h` is only pulled in for programs
    /// that import `random`.
    pub fn emit_includes(ctx: &mut CodegenContext<'_>, needs_time: bool) {
        for header in HEADERS {
            ctx.writeln(&format!("#include <{header}>"));
        }
        if needs_time {
            ctx.writeln("#include <time.h>");
        }
        ctx.newline();
    }

    /// Emit the `PI` and `E` constants.
    pub fn emit_constants(ctx: &mut CodegenContext<'_>) {
        ctx.write(CONSTANTS);
        ctx.newline();
    }

    /// Emit every runtime helper, once, ahead of user code.
    pub fn emit_helpers(ctx: &mut CodegenContext<'_>) {
        Self::emit_section(ctx, "mathc runtime", &[
            RANGE,
            ARITHMETIC,
            STATISTICS,
            NUMBER_THEORY,
            SEARCH,
            COMPLEX,
            SETS,
        ]);
    }

    /// Emit the print and input helpers.
    pub fn emit_io(ctx: &mut CodegenContext<'_>) {
        Self::emit_section(ctx, "mathc I/O", &[PRINT, INPUT]);
    }

    fn emit_section(ctx: &mut CodegenContext<'_>, title: &str, parts: &[&str]) {
        ctx.writeln(BANNER);
        ctx.writeln(&format!("/* {title} */"));
        ctx.writeln(BANNER);
        ctx.newline();
        for part in parts {
            ctx.write(part);
            ctx.newline();
        }
    }
}
