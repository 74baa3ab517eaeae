//! Built-in maze layouts.
//!
//! `%` wall, `.` food, `o` capsule, `P` pacman, `G` (or `1`-`4`) ghost,
//! space is an empty corridor.

pub const TEST_CLASSIC: &str = "\
%%%%%
% . %
%.G.%
% . %
%. .%
%   %
%  .%
%   %
%P .%
%%%%%";

pub const MINIMAX_CLASSIC: &str = "\
%%%%%%%%%
%.P    G%
% %.%G%%%
%G    %%%
%%%%%%%%%";

pub const TRAPPED_CLASSIC: &str = "\
%%%%%%%%
%   P G%
%G%%%%%%
%....  %
%%%%%%%%";

pub const SMALL_CLASSIC: &str = "\
%%%%%%%%%%%%%%%%%%%%
%......%G  G%......%
%.%%...%%  %%...%%.%
%.%o.%........%.o%.%
%.%%.%.%%%%%%.%.%%.%
%........P.........%
%%%%%%%%%%%%%%%%%%%%";

/// Every built-in layout with its name.
pub const ALL: [(&str, &str); 4] = [
    ("testClassic", TEST_CLASSIC),
    ("minimaxClassic", MINIMAX_CLASSIC),
    ("trappedClassic", TRAPPED_CLASSIC),
    ("smallClassic", SMALL_CLASSIC),
];

/// Look up a built-in layout by name.
pub fn by_name(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, layout)| *layout)
}
