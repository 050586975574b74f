//! 调色板：tile 编号 -> 显示颜色。
//!
//! 与格子数据相互独立：格子里可以出现调色板里没有的编号（不绘制），
//! 调色板也可以有地图里没用到的编号。删除条目永远不会修改格子。

use std::collections::BTreeMap;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PaletteError;
use crate::layer::{TileId, EMPTY_TILE};

/// `#rrggbb` 颜色。
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid color {:?} (expected #rrggbb)", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BTreeMap<TileId, Rgb>", into = "BTreeMap<TileId, Rgb>")
)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    entries: BTreeMap<TileId, Rgb>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn get(&self, id: TileId) -> Option<Rgb> {
        self.entries.get(&id).copied()
    }

    /// 按编号升序遍历。
    pub fn iter(&self) -> impl Iterator<Item = (TileId, Rgb)> + '_ {
        self.entries.iter().map(|(&id, &c)| (id, c))
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.entries.keys().copied()
    }

    pub fn first_id(&self) -> Option<TileId> {
        self.entries.keys().next().copied()
    }

    /// 比当前最大编号大 1 的编号（空调色板时为 1）。
    pub fn next_free_id(&self) -> TileId {
        self.entries
            .keys()
            .next_back()
            .map(|&id| id.saturating_add(1))
            .unwrap_or(1)
    }

    pub fn add(&mut self, id: TileId, color: Rgb) -> Result<(), PaletteError> {
        if id == EMPTY_TILE {
            return Err(PaletteError::InvalidId);
        }
        if self.entries.contains_key(&id) {
            return Err(PaletteError::DuplicateId(id));
        }
        self.entries.insert(id, color);
        Ok(())
    }

    /// 返回旧颜色。
    pub fn edit(&mut self, id: TileId, color: Rgb) -> Result<Rgb, PaletteError> {
        let slot = self
            .entries
            .get_mut(&id)
            .ok_or(PaletteError::UnknownId(id))?;
        Ok(std::mem::replace(slot, color))
    }

    pub fn remove(&mut self, id: TileId) -> Result<Rgb, PaletteError> {
        self.entries.remove(&id).ok_or(PaletteError::UnknownId(id))
    }

    /// 在 `ids()` 顺序中取 `from` 的下一个 / 上一个编号（循环）。
    pub fn cycle(&self, from: Option<TileId>, forward: bool) -> Option<TileId> {
        let ids: Vec<TileId> = self.ids().collect();
        if ids.is_empty() {
            return None;
        }
        let Some(pos) = from.and_then(|id| ids.iter().position(|&x| x == id)) else {
            return ids.first().copied();
        };
        let next = if forward {
            (pos + 1) % ids.len()
        } else {
            (pos + ids.len() - 1) % ids.len()
        };
        Some(ids[next])
    }
}

impl FromIterator<(TileId, Rgb)> for Palette {
    fn from_iter<T: IntoIterator<Item = (TileId, Rgb)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().filter(|(id, _)| *id != EMPTY_TILE).collect(),
        }
    }
}

// 0 不能作为调色板编号，从文件读入时直接丢掉
impl From<BTreeMap<TileId, Rgb>> for Palette {
    fn from(value: BTreeMap<TileId, Rgb>) -> Self {
        value.into_iter().collect()
    }
}

impl From<Palette> for BTreeMap<TileId, Rgb> {
    fn from(value: Palette) -> Self {
        value.entries
    }
}

/// 默认调色板：1 深灰、2 棕、3 灰、4 深绿。
pub fn default_palette() -> Palette {
    [
        (1, Rgb::new(0x22, 0x22, 0x22)),
        (2, Rgb::new(0x8b, 0x45, 0x13)),
        (3, Rgb::new(0x88, 0x88, 0x88)),
        (4, Rgb::new(0x00, 0x44, 0x00)),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_print_hex() {
        let c: Rgb = "#8b4513".parse().unwrap();
        assert_eq!(c, Rgb::new(0x8b, 0x45, 0x13));
        assert_eq!(c.to_string(), "#8b4513");
        assert_eq!("#FFFFFF".parse::<Rgb>().unwrap(), Rgb::new(255, 255, 255));
        assert!("8b4513".parse::<Rgb>().is_err());
        assert!("#8b451".parse::<Rgb>().is_err());
        assert!("#zz4513".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_add_rejects_zero_and_duplicates() {
        let mut p = Palette::new();
        assert_eq!(p.add(0, Rgb::new(1, 2, 3)), Err(PaletteError::InvalidId));
        p.add(5, Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(
            p.add(5, Rgb::new(9, 9, 9)),
            Err(PaletteError::DuplicateId(5))
        );
        assert_eq!(p.get(5), Some(Rgb::new(1, 2, 3)));
    }

    #[test]
    fn test_edit_and_remove_need_existing_id() {
        let mut p = default_palette();
        assert_eq!(
            p.edit(9, Rgb::new(0, 0, 0)),
            Err(PaletteError::UnknownId(9))
        );
        let old = p.edit(1, Rgb::new(0xff, 0, 0)).unwrap();
        assert_eq!(old, Rgb::new(0x22, 0x22, 0x22));
        assert_eq!(p.get(1), Some(Rgb::new(0xff, 0, 0)));

        assert_eq!(p.remove(9), Err(PaletteError::UnknownId(9)));
        p.remove(1).unwrap();
        assert!(!p.contains(1));
        assert_eq!(p.first_id(), Some(2));
    }

    #[test]
    fn test_iteration_is_sorted() {
        let p: Palette = [(7, Rgb::new(0, 0, 0)), (2, Rgb::new(1, 1, 1)), (0, Rgb::new(2, 2, 2))]
            .into_iter()
            .collect();
        assert_eq!(p.ids().collect::<Vec<_>>(), vec![2, 7]);
        assert_eq!(p.next_free_id(), 8);
        assert_eq!(Palette::new().next_free_id(), 1);
    }

    #[test]
    fn test_cycle() {
        let p = default_palette();
        assert_eq!(p.cycle(Some(1), true), Some(2));
        assert_eq!(p.cycle(Some(4), true), Some(1));
        assert_eq!(p.cycle(Some(1), false), Some(4));
        assert_eq!(p.cycle(None, true), Some(1));
        assert_eq!(p.cycle(Some(99), false), Some(1));
        assert_eq!(Palette::new().cycle(Some(1), true), None);
    }
}
