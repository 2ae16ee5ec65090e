/*!
## Emulated address space

PEEK, POKE, BLOAD and BSAVE see a 20 bit address space built from a
16 bit segment and a 16 bit offset. Each linear address belongs to one
region, found by scanning the region table from the highest base
down. Video memory and the BASIC data segment belong to other parts of
the interpreter and are reached through the `VideoMemory` and
`DataStore` traits. Reads of anything not emulated give zero.
*/

use super::config::{Config, Syntax};
use super::val::Val;
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

pub const DATA_SEGMENT: u16 = 0x13ad;
const VIDEO_SEGMENT: u32 = 0xa000;
const RAM_FONT_SEGMENT: u32 = 0xc000;
const ROM_SEGMENT: u32 = 0xf000;
const VIDEO_BASE: u32 = VIDEO_SEGMENT * 0x10;
const VIDEO_END: u32 = VIDEO_BASE + 0x20000;
const ROM_FONT_ADDR: i64 = 0xfa6e;
const RAM_FONT_ADDR: u32 = 0x500;
const NOTICE_ADDR: u32 = 0xe00e;
const NOTICE_LEN: u32 = 80;
const MACHINE_ID_ADDR: u32 = 0xfffe;
const KEY_BUFFER_OFFSET: u32 = 30;
const KEY_SLOTS: usize = 16;
const PROTECTION_FLAG_ADDR: u32 = 1450;
const FILE_HEADER_SIZE: u32 = 194;
const BSAVE_MAGIC: u8 = 0xfd;
const EOF: u8 = 0x1a;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Rom,
    RamFont,
    Video,
    Data,
    Low,
}

/// Checked first to last; the first base at or below an address wins.
pub const REGIONS: &[(u32, Region)] = &[
    (ROM_SEGMENT * 0x10, Region::Rom),
    (RAM_FONT_SEGMENT * 0x10, Region::RamFont),
    (VIDEO_BASE, Region::Video),
    (DATA_SEGMENT as u32 * 0x10, Region::Data),
    (0, Region::Low),
];

pub fn region_of(addr: u32) -> Region {
    REGIONS
        .iter()
        .find(|(base, _)| addr >= *base)
        .map(|(_, region)| *region)
        .unwrap_or(Region::Low)
}

/// Memory mapped screen. Packing of text and pixels depends on the
/// screen mode, so the display owns it.
pub trait VideoMemory {
    /// Exactly `length` bytes from linear address `addr`.
    fn get_memory(&self, addr: u32, length: usize) -> Vec<u8>;
    fn set_memory(&mut self, addr: u32, bytes: &[u8]);
}

/// Flat video memory for when no display is attached.
#[derive(Debug)]
pub struct VideoBuffer {
    bytes: Vec<u8>,
}

impl Default for VideoBuffer {
    fn default() -> VideoBuffer {
        VideoBuffer {
            bytes: vec![0; (VIDEO_END - VIDEO_BASE) as usize],
        }
    }
}

impl VideoMemory for VideoBuffer {
    fn get_memory(&self, addr: u32, length: usize) -> Vec<u8> {
        (addr..addr + length as u32)
            .map(|a| {
                a.checked_sub(VIDEO_BASE)
                    .and_then(|i| self.bytes.get(i as usize))
                    .copied()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn set_memory(&mut self, addr: u32, bytes: &[u8]) {
        for (a, byte) in (addr..).zip(bytes) {
            if let Some(slot) = a
                .checked_sub(VIDEO_BASE)
                .and_then(|i| self.bytes.get_mut(i as usize))
            {
                *slot = *byte;
            }
        }
    }
}

/// Program text, FIELD buffers and variables inside the data segment.
/// Offsets are relative to the start of each area. Missing bytes read
/// as zero and writes nobody handles are dropped.
pub trait DataStore {
    fn code_size(&self) -> u32 {
        0
    }
    fn code_byte(&self, _offset: u32) -> Option<u8> {
        None
    }
    fn set_code_byte(&mut self, _offset: u32, _val: u8) {}
    /// `file` counts from 1.
    fn field_byte(&self, _file: u32, _offset: u32) -> Option<u8> {
        None
    }
    fn scalar_size(&self) -> u32 {
        0
    }
    fn array_size(&self) -> u32 {
        0
    }
    fn variable_byte(&self, _offset: u32) -> Option<u8> {
        None
    }
    fn is_protected(&self) -> bool {
        false
    }
    /// POKE to the protection flag. Ignored unless protection is allowed.
    fn set_protected(&mut self, _protected: bool) {}
}

/// Data segment contents kept in plain vectors.
#[derive(Debug, Default)]
pub struct ProgramImage {
    pub code: Vec<u8>,
    pub fields: Vec<Vec<u8>>,
    pub variables: Vec<u8>,
    pub scalars: u32,
    pub protected: bool,
    pub allow_protect: bool,
}

impl DataStore for ProgramImage {
    fn code_size(&self) -> u32 {
        self.code.len() as u32
    }

    fn code_byte(&self, offset: u32) -> Option<u8> {
        self.code.get(offset as usize).copied()
    }

    fn set_code_byte(&mut self, offset: u32, val: u8) {
        if let Some(byte) = self.code.get_mut(offset as usize) {
            *byte = val;
        }
    }

    fn field_byte(&self, file: u32, offset: u32) -> Option<u8> {
        self.fields
            .get(file.checked_sub(1)? as usize)?
            .get(offset as usize)
            .copied()
    }

    fn scalar_size(&self) -> u32 {
        self.scalars
    }

    fn array_size(&self) -> u32 {
        (self.variables.len() as u32).saturating_sub(self.scalars)
    }

    fn variable_byte(&self, offset: u32) -> Option<u8> {
        self.variables.get(offset as usize).copied()
    }

    fn is_protected(&self) -> bool {
        self.protected
    }

    fn set_protected(&mut self, protected: bool) {
        if self.allow_protect {
            self.protected = protected;
        }
    }
}

/// 8x8 character bitmaps. Characters 0-127 appear in ROM and 128-254
/// in RAM where programs may redefine them.
#[derive(Debug, Clone)]
pub struct Font {
    glyphs: Vec<[u8; 8]>,
}

impl Default for Font {
    fn default() -> Font {
        Font {
            glyphs: vec![[0; 8]; 256],
        }
    }
}

impl Font {
    pub fn get_byte(&self, ch: u8, row: usize) -> u8 {
        self.glyphs[ch as usize][row % 8]
    }

    pub fn set_byte(&mut self, ch: u8, row: usize, val: u8) {
        self.glyphs[ch as usize][row % 8] = val;
    }

    pub fn set_glyph(&mut self, ch: u8, glyph: [u8; 8]) {
        self.glyphs[ch as usize] = glyph;
    }
}

/// BIOS keyboard buffer: sixteen slots of character and scancode
/// with head and tail indices.
#[derive(Debug, Clone, Default)]
pub struct KeyRing {
    slots: [(u8, u8); KEY_SLOTS],
    start: usize,
    stop: usize,
}

impl KeyRing {
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// False when full.
    pub fn push(&mut self, ch: u8, scan: u8) -> bool {
        let next = (self.stop + 1) % KEY_SLOTS;
        if next == self.start {
            return false;
        }
        self.slots[self.stop] = (ch, scan);
        self.stop = next;
        true
    }

    pub fn pop(&mut self) -> Option<(u8, u8)> {
        if self.is_empty() {
            return None;
        }
        let key = self.slots[self.start];
        self.start = (self.start + 1) % KEY_SLOTS;
        Some(key)
    }

    fn pointer(index: usize) -> u32 {
        index as u32 * 2 + KEY_BUFFER_OFFSET
    }

    fn index(pointer: u8) -> usize {
        (pointer as i32 - KEY_BUFFER_OFFSET as i32)
            .div_euclid(2)
            .rem_euclid(KEY_SLOTS as i32) as usize
    }
}

/// Copies of display state the BIOS keeps in low memory. The display
/// updates these; POKEs to them are ignored.
#[derive(Debug, Clone)]
pub struct ScreenMirror {
    pub mode: u8,
    pub width: u16,
    pub page_size: u16,
    /// One based, like the text screen.
    pub col: u8,
    pub row: u8,
    pub cursor_from: u8,
    pub cursor_to: u8,
    pub visual_page: u8,
    pub mode_info: u8,
    pub colour: u8,
}

impl Default for ScreenMirror {
    fn default() -> ScreenMirror {
        // 80 column colour text, as at power on
        ScreenMirror {
            mode: 3,
            width: 80,
            page_size: 4096,
            col: 1,
            row: 1,
            cursor_from: 6,
            cursor_to: 7,
            visual_page: 0,
            mode_info: 0x29,
            colour: 0x30,
        }
    }
}

/// BIOS data area below the BASIC data segment.
#[derive(Debug, Clone, Default)]
pub struct LowMemory {
    pub modifiers: u8,
    pub keypad: u8,
    pub keys: KeyRing,
    pub screen: ScreenMirror,
    pub com_ports: u8,
    pub lpt_ports: u8,
}

impl LowMemory {
    fn get(&self, addr: u32, monochrome: bool) -> Option<u8> {
        let key_slots = 1024 + KEY_BUFFER_OFFSET..1024 + KEY_BUFFER_OFFSET + 2 * KEY_SLOTS as u32;
        let screen = &self.screen;
        Some(match addr {
            124 => (RAM_FONT_ADDR % 256) as u8,
            125 => (RAM_FONT_ADDR / 256) as u8,
            126 => (RAM_FONT_SEGMENT % 256) as u8,
            127 => (RAM_FONT_SEGMENT / 256) as u8,
            1040 if monochrome => 48 + 6,
            1040 => 32 + 6,
            1041 => 2 * self.com_ports + 16 + 64 * self.lpt_ports,
            1047 => self.modifiers,
            1048 => 0,
            1049 => self.keypad,
            1050 => KeyRing::pointer(self.keys.start) as u8,
            1051 => (KeyRing::pointer(self.keys.start) >> 8) as u8,
            1052 => KeyRing::pointer(self.keys.stop) as u8,
            1053 => (KeyRing::pointer(self.keys.stop) >> 8) as u8,
            a if key_slots.contains(&a) => {
                let offset = a - key_slots.start;
                let (ch, scan) = self.keys.slots[(offset / 2) as usize];
                if offset % 2 == 1 {
                    scan
                } else {
                    ch
                }
            }
            1097 => screen.mode,
            1098 => screen.width as u8,
            1099 => (screen.width >> 8) as u8,
            1100 => screen.page_size as u8,
            1101 => (screen.page_size >> 8) as u8,
            1104..=1119 if addr % 2 == 0 => screen.col.wrapping_sub(1),
            1104..=1119 => screen.row.wrapping_sub(1),
            1120 => screen.cursor_to,
            1121 => screen.cursor_from,
            1122 => screen.visual_page,
            1125 => screen.mode_info,
            1126 => screen.colour,
            _ => return None,
        })
    }

    fn set(&mut self, addr: u32, val: u8) {
        let key_slots = 1024 + KEY_BUFFER_OFFSET..1024 + KEY_BUFFER_OFFSET + 2 * KEY_SLOTS as u32;
        match addr {
            1047 => self.modifiers = val,
            1050 => self.keys.start = KeyRing::index(val),
            1052 => self.keys.stop = KeyRing::index(val),
            a if key_slots.contains(&a) => {
                let offset = a - key_slots.start;
                let slot = &mut self.keys.slots[(offset / 2) as usize];
                if offset % 2 == 1 {
                    slot.1 = val;
                } else if val == 0xe0 {
                    slot.0 = 0;
                } else {
                    slot.0 = val;
                }
            }
            _ => log::trace!("POKE {} IGNORED", addr),
        }
    }
}

/// Where the areas of the data segment start, from CLEAR parameters.
#[derive(Debug, Clone)]
struct DataLayout {
    total_memory: u32,
    field_mem_offset: u32,
    field_mem_start: u32,
    code_start: u32,
}

impl DataLayout {
    fn new(config: &Config) -> DataLayout {
        let field_mem_offset = FILE_HEADER_SIZE + config.max_reclen;
        DataLayout {
            total_memory: config.total_memory,
            field_mem_offset,
            field_mem_start: config.reserved_memory + field_mem_offset + FILE_HEADER_SIZE,
            code_start: config.reserved_memory + (config.max_files + 1) * field_mem_offset,
        }
    }
}

pub struct AddressSpace {
    config: Config,
    layout: DataLayout,
    segment: u16,
    run_mode: bool,
    font: Font,
    low: LowMemory,
    video: Box<dyn VideoMemory>,
    store: Box<dyn DataStore>,
    /// Bytes poked where no model stands behind the address.
    retained: HashMap<u32, u8>,
}

impl Default for AddressSpace {
    fn default() -> AddressSpace {
        AddressSpace::new(Config::default())
    }
}

impl AddressSpace {
    pub fn new(config: Config) -> AddressSpace {
        AddressSpace {
            layout: DataLayout::new(&config),
            config,
            segment: DATA_SEGMENT,
            run_mode: false,
            font: Font::default(),
            low: LowMemory::default(),
            video: Box::new(VideoBuffer::default()),
            store: Box::new(ProgramImage::default()),
            retained: HashMap::new(),
        }
    }

    pub fn set_video(&mut self, video: Box<dyn VideoMemory>) {
        self.video = video;
    }

    pub fn set_store(&mut self, store: Box<dyn DataStore>) {
        self.store = store;
    }

    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn DataStore {
        self.store.as_mut()
    }

    pub fn font_mut(&mut self) -> &mut Font {
        &mut self.font
    }

    pub fn low_mut(&mut self) -> &mut LowMemory {
        &mut self.low
    }

    /// The executor reports whether a program is running.
    pub fn set_run_mode(&mut self, run_mode: bool) {
        self.run_mode = run_mode;
    }

    /// Back to power-on state. Collaborators stay attached.
    pub fn reset(&mut self) {
        self.segment = DATA_SEGMENT;
        self.run_mode = false;
        self.low = LowMemory::default();
        self.retained.clear();
    }

    pub fn segment(&self) -> u16 {
        self.segment
    }

    /// DEF SEG. No argument selects the BASIC data segment.
    pub fn def_seg(&mut self, segment: Option<Val>) -> Result<()> {
        self.segment = match segment {
            None => DATA_SEGMENT,
            Some(val) => val.pass_unsigned()?,
        };
        log::debug!("DEF SEG {:04X}", self.segment);
        Ok(())
    }

    fn check_protection(&self) -> Result<()> {
        if self.store.is_protected() && !self.run_mode {
            return Err(error!(IllegalFunctionCall; "PROTECTED"));
        }
        Ok(())
    }

    fn linear(&self, offset: u16) -> u32 {
        self.segment as u32 * 0x10 + offset as u32
    }

    /// PEEK at an offset in the current segment.
    pub fn peek(&self, offset: u16) -> Result<u8> {
        self.check_protection()?;
        Ok(self.peek_linear(self.linear(offset)))
    }

    /// POKE at an offset in the current segment.
    pub fn poke(&mut self, offset: u16, val: i16) -> Result<()> {
        self.check_protection()?;
        if !(0..=255).contains(&val) {
            return Err(error!(IllegalFunctionCall));
        }
        self.poke_linear(self.linear(offset), val as u8);
        Ok(())
    }

    pub fn peek_linear(&self, addr: u32) -> u8 {
        let poked = self.retained.get(&addr);
        if let Some(val) = poked.or_else(|| self.config.peek_values.get(&addr)) {
            return *val;
        }
        let region = region_of(addr);
        log::trace!("PEEK {:05X} {:?}", addr, region);
        let val = match region {
            Region::Rom => self.get_rom(addr - ROM_SEGMENT * 0x10),
            Region::RamFont => font_index(addr).map(|(ch, row)| self.font.get_byte(ch, row)),
            Region::Video => self.video.get_memory(addr, 1).first().copied(),
            Region::Data => self.get_data(addr - DATA_SEGMENT as u32 * 0x10),
            Region::Low => self.low.get(addr, self.config.monochrome),
        };
        val.unwrap_or(0)
    }

    pub fn poke_linear(&mut self, addr: u32, val: u8) {
        let region = region_of(addr);
        log::trace!("POKE {:05X} {:?} {}", addr, region, val);
        match region {
            Region::Rom => log::warn!("POKE {:05X} INTO ROM IGNORED", addr),
            Region::RamFont => {
                if let Some((ch, row)) = font_index(addr) {
                    self.font.set_byte(ch, row, val);
                }
            }
            Region::Video => self.video.set_memory(addr, &[val]),
            Region::Data => self.set_data(addr - DATA_SEGMENT as u32 * 0x10, val),
            Region::Low => self.low.set(addr, val),
        }
    }

    /// Bytes for BSAVE. The video part goes to the display in one call.
    pub fn read_block(&self, addr: u32, length: usize) -> Vec<u8> {
        log::trace!("READ BLOCK {:05X} {}", addr, length);
        let end = addr + length as u32;
        let mut block = Vec::with_capacity(length);
        let mut addr = addr;
        while addr < end {
            if (VIDEO_BASE..VIDEO_END).contains(&addr) {
                let len = (end.min(VIDEO_END) - addr) as usize;
                let mut video = self.video.get_memory(addr, len);
                video.resize(len, 0);
                block.extend(video);
                addr += len as u32;
            } else {
                block.push(self.peek_linear(addr));
                addr += 1;
            }
        }
        block
    }

    /// Bytes from BLOAD, split the same way as `read_block`.
    pub fn write_block(&mut self, addr: u32, bytes: &[u8]) {
        log::trace!("WRITE BLOCK {:05X} {}", addr, bytes.len());
        let mut addr = addr;
        let mut rest = bytes;
        while let Some((&first, tail)) = rest.split_first() {
            if (VIDEO_BASE..VIDEO_END).contains(&addr) {
                let len = ((VIDEO_END - addr) as usize).min(rest.len());
                self.video.set_memory(addr, &rest[..len]);
                addr += len as u32;
                rest = &rest[len..];
            } else {
                self.poke_linear(addr, first);
                addr += 1;
                rest = tail;
            }
        }
    }

    /// BSAVE file contents for `length` bytes at `offset` in the
    /// current segment.
    pub fn bsave_image(&self, offset: u16, length: u16) -> Result<Vec<u8>> {
        self.check_protection()?;
        let mut header = vec![BSAVE_MAGIC];
        header.extend(&self.segment.to_le_bytes());
        header.extend(&offset.to_le_bytes());
        header.extend(&length.to_le_bytes());
        let mut image = header.clone();
        image.extend(self.read_block(self.linear(offset), length as usize));
        if self.config.syntax == Syntax::Tandy {
            image.extend(header);
        }
        image.push(EOF);
        Ok(image)
    }

    /// BLOAD a file image. Without an offset the one saved in the file
    /// is used. The segment always comes from the file.
    pub fn bload_image(&mut self, image: &[u8], offset: Option<u16>) -> Result<()> {
        self.check_protection()?;
        if image.len() < 7 || image[0] != BSAVE_MAGIC {
            return Err(error!(BadFileMode));
        }
        let segment = u16::from_le_bytes([image[1], image[2]]);
        let offset = offset.unwrap_or_else(|| u16::from_le_bytes([image[3], image[4]]));
        let mut payload = &image[7..];
        if payload.last() == Some(&EOF) {
            payload = &payload[..payload.len() - 1];
        }
        if self.config.syntax == Syntax::Tandy {
            payload = &payload[..payload.len().saturating_sub(7)];
        }
        let addr = segment as u32 * 0x10 + offset as u32;
        self.write_block(addr, payload);
        Ok(())
    }

    fn get_rom(&self, addr: u32) -> Option<u8> {
        if addr == MACHINE_ID_ADDR {
            return Some(match self.config.syntax {
                Syntax::Pcjr => 0xfd,
                _ => 0xff,
            });
        }
        if (NOTICE_ADDR..NOTICE_ADDR + NOTICE_LEN).contains(&addr) {
            return self.config.notice.get((addr - NOTICE_ADDR) as usize).copied();
        }
        let offset = addr as i64 - ROM_FONT_ADDR;
        let ch = offset.div_euclid(8);
        if (0..=127).contains(&ch) {
            Some(self.font.get_byte(ch as u8, offset.rem_euclid(8) as usize))
        } else {
            None
        }
    }

    fn var_start(&self) -> u32 {
        self.layout.code_start + self.store.code_size()
    }

    fn var_current(&self) -> u32 {
        self.var_start() + self.store.scalar_size()
    }

    /// `addr` is an offset into the data segment.
    fn get_data(&self, addr: u32) -> Option<u8> {
        let layout = &self.layout;
        if addr >= self.var_start() {
            self.store.variable_byte(addr - self.var_start())
        } else if addr >= layout.code_start {
            self.store.code_byte(addr - layout.code_start)
        } else if addr >= layout.field_mem_start {
            let start = addr - layout.field_mem_start;
            let file = 1 + start / layout.field_mem_offset;
            self.store.field_byte(file, start % layout.field_mem_offset)
        } else {
            self.get_data_fields(addr)
        }
    }

    fn get_data_fields(&self, addr: u32) -> Option<u8> {
        let word = match addr {
            // GW-BASIC sentinel
            0..=3 => return Some([0x00, 0x00, 0x10, 0x82][addr as usize]),
            0x2c | 0x2d => self.layout.total_memory,
            0x30 | 0x31 => self.layout.code_start + 1,
            0x358 | 0x359 => self.var_start(),
            0x35a | 0x35b => self.var_current(),
            0x35c | 0x35d => self.var_current() + self.store.array_size(),
            PROTECTION_FLAG_ADDR => return Some(if self.store.is_protected() { 255 } else { 0 }),
            _ => return None,
        };
        let bytes = (word as u16).to_le_bytes();
        Some(bytes[(addr % 2) as usize])
    }

    fn set_data(&mut self, addr: u32, val: u8) {
        let layout = &self.layout;
        if addr >= layout.code_start && addr < self.var_start() {
            if self.config.allow_code_poke {
                self.store.set_code_byte(addr - layout.code_start, val);
            } else {
                log::warn!("POKE INTO PROGRAM CODE IGNORED");
            }
        } else if addr >= layout.field_mem_start {
            // variables and FIELD buffers read back what was poked
            self.retained.insert(addr + DATA_SEGMENT as u32 * 0x10, val);
        } else if addr == PROTECTION_FLAG_ADDR {
            self.store.set_protected(val != 0);
        }
    }
}

fn font_index(addr: u32) -> Option<(u8, usize)> {
    let offset = addr as i64 - (RAM_FONT_SEGMENT * 0x10 + RAM_FONT_ADDR) as i64;
    let ch = offset.div_euclid(8) + 128;
    if (128..=254).contains(&ch) {
        Some((ch as u8, offset.rem_euclid(8) as usize))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;
    use crate::mach::mbf::Mbf;

    #[test]
    fn test_regions() {
        assert_eq!(region_of(0xffffe), Region::Rom);
        assert_eq!(region_of(0xc0500), Region::RamFont);
        assert_eq!(region_of(0xb8000), Region::Video);
        assert_eq!(region_of(0x13ad0), Region::Data);
        assert_eq!(region_of(0x13acf), Region::Low);
    }

    #[test]
    fn test_ram_font() {
        let mut mem = AddressSpace::default();
        mem.def_seg(Some(Val::Integer(0xc000u16 as i16))).unwrap();
        mem.poke(0x500, 0x7e).unwrap();
        assert_eq!(mem.peek(0x500).unwrap(), 0x7e);
        assert_eq!(mem.font.get_byte(128, 0), 0x7e);
        // char 255 is not in the table
        mem.poke(0x500 + 127 * 8, 1).unwrap();
        assert_eq!(mem.peek(0x500 + 127 * 8).unwrap(), 0);
    }

    #[test]
    fn test_rom() {
        let mut mem = AddressSpace::default();
        mem.def_seg(Some(Val::Single(crate::mach::Single::from_int(0xf000)))).unwrap();
        assert_eq!(mem.peek(0xfffe).unwrap(), 0xff);
        assert_eq!(mem.peek(0xe00e).unwrap(), b'b');
        mem.poke(0xfffe, 0).unwrap();
        assert_eq!(mem.peek(0xfffe).unwrap(), 0xff);
        let pcjr = AddressSpace::new(Config {
            syntax: Syntax::Pcjr,
            ..Config::default()
        });
        assert_eq!(pcjr.peek_linear(0xffffe), 0xfd);
    }

    #[test]
    fn test_low_memory() {
        let mut mem = AddressSpace::default();
        mem.def_seg(Some(Val::Integer(0))).unwrap();
        assert_eq!(mem.peek(1040).unwrap(), 38);
        assert_eq!(mem.peek(126).unwrap(), 0x00);
        assert_eq!(mem.peek(127).unwrap(), 0xc0);
        assert_eq!(mem.peek(1234).unwrap(), 0);
        mem.poke(1047, 0x40).unwrap();
        assert_eq!(mem.peek(1047).unwrap(), 0x40);
        assert_eq!(mem.peek(1098).unwrap(), 80);
        assert_eq!(mem.peek(1104).unwrap(), 0);
    }

    #[test]
    fn test_key_ring() {
        let mut mem = AddressSpace::default();
        mem.low_mut().keys.push(b'A', 0x1e);
        mem.def_seg(Some(Val::Integer(0))).unwrap();
        assert_eq!(mem.peek(1050).unwrap(), 30);
        assert_eq!(mem.peek(1052).unwrap(), 32);
        assert_eq!(mem.peek(1054).unwrap(), b'A');
        assert_eq!(mem.peek(1055).unwrap(), 0x1e);
        // clear the buffer the documented way
        let tail = mem.peek(1052).unwrap();
        mem.poke(1050, tail as i16).unwrap();
        assert!(mem.low.keys.is_empty());
        mem.poke(1056, b'B' as i16).unwrap();
        mem.poke(1052, 34).unwrap();
        assert_eq!(mem.low.keys.pop(), Some((b'B', 0)));
    }

    #[test]
    fn test_data_segment() {
        let mut mem = AddressSpace::default();
        assert_eq!(mem.segment(), DATA_SEGMENT);
        let sentinel: Vec<u8> = (0..4).map(|a| mem.peek(a).unwrap()).collect();
        assert_eq!(sentinel, vec![0x00, 0x00, 0x10, 0x82]);
        assert_eq!(mem.peek(0x2c).unwrap(), 0xfe);
        assert_eq!(mem.peek(0x2d).unwrap(), 0xff);
        assert_eq!(mem.peek(0x30).unwrap(), 0x6e);
        assert_eq!(mem.peek(0x31).unwrap(), 0x12);
        mem.set_store(Box::new(ProgramImage {
            code: vec![0, 1, 2, 3],
            allow_protect: true,
            ..ProgramImage::default()
        }));
        assert_eq!(mem.peek(4717 + 2).unwrap(), 2);
        mem.poke(4717 + 2, 9).unwrap();
        assert_eq!(mem.peek(4717 + 2).unwrap(), 2);
        assert_eq!(mem.peek(0x358).unwrap(), ((4717 + 4) % 256) as u8);
        mem.poke(1450, 1).unwrap();
        assert!(mem.store().is_protected());
        assert!(mem.peek(1450).unwrap_err().is(ErrorCode::IllegalFunctionCall));
        mem.set_run_mode(true);
        assert_eq!(mem.peek(1450).unwrap(), 255);
    }

    #[test]
    fn test_code_poke_needs_permission() {
        let image = || {
            Box::new(ProgramImage {
                code: vec![0, 1, 2, 3],
                ..ProgramImage::default()
            })
        };
        let mut mem = AddressSpace::new(Config {
            allow_code_poke: true,
            ..Config::default()
        });
        mem.set_store(image());
        mem.poke(4717 + 1, 9).unwrap();
        assert_eq!(mem.peek(4717 + 1).unwrap(), 9);
        assert_eq!(mem.store().code_byte(1), Some(9));
        let mut mem = AddressSpace::default();
        mem.set_store(image());
        mem.poke(4717 + 1, 9).unwrap();
        assert_eq!(mem.peek(4717 + 1).unwrap(), 1);
    }

    #[test]
    fn test_variable_and_field_pokes_read_back() {
        let mut mem = AddressSpace::default();
        let var_addr = 4717 + 100;
        let field_addr = 4000;
        assert_eq!(mem.peek(var_addr).unwrap(), 0);
        mem.poke(var_addr, 0x5a).unwrap();
        mem.poke(field_addr, 0x11).unwrap();
        assert_eq!(mem.peek(var_addr).unwrap(), 0x5a);
        assert_eq!(mem.peek(field_addr).unwrap(), 0x11);
        let linear = DATA_SEGMENT as u32 * 0x10 + var_addr as u32;
        assert_eq!(mem.read_block(linear, 1), vec![0x5a]);
        mem.reset();
        assert_eq!(mem.peek(var_addr).unwrap(), 0);
    }

    #[test]
    fn test_poke_range() {
        let mut mem = AddressSpace::default();
        assert!(mem.poke(0, 256).unwrap_err().is(ErrorCode::IllegalFunctionCall));
        assert!(mem.poke(0, -1).unwrap_err().is(ErrorCode::IllegalFunctionCall));
    }

    #[test]
    fn test_def_seg() {
        let mut mem = AddressSpace::default();
        mem.def_seg(Some(Val::Integer(-1))).unwrap();
        assert_eq!(mem.segment(), 0xffff);
        mem.def_seg(None).unwrap();
        assert_eq!(mem.segment(), DATA_SEGMENT);
        let s = Val::String(crate::mach::StrDesc::default());
        assert!(mem.def_seg(Some(s)).unwrap_err().is(ErrorCode::TypeMismatch));
    }

    #[test]
    fn test_presets_win() {
        let mut config = Config::default();
        config.peek_values.insert(0xffffe, 0x42);
        let mem = AddressSpace::new(config);
        assert_eq!(mem.peek_linear(0xffffe), 0x42);
    }

    #[test]
    fn test_block_across_video_start() {
        let mut config = Config::default();
        config.peek_values.insert(VIDEO_BASE - 2, 1);
        config.peek_values.insert(VIDEO_BASE - 1, 2);
        let mut mem = AddressSpace::new(config);
        mem.write_block(VIDEO_BASE, &[3, 4]);
        assert_eq!(mem.read_block(VIDEO_BASE - 2, 4), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_bsave_bload() {
        let mut mem = AddressSpace::default();
        mem.def_seg(Some(Val::Integer(0xb800u16 as i16))).unwrap();
        mem.poke(0, b'H' as i16).unwrap();
        mem.poke(1, 7).unwrap();
        let image = mem.bsave_image(0, 2).unwrap();
        assert_eq!(image, vec![0xfd, 0x00, 0xb8, 0, 0, 2, 0, b'H', 7, 0x1a]);
        mem.bload_image(&image, Some(2)).unwrap();
        assert_eq!(mem.peek(2).unwrap(), b'H');
        assert_eq!(mem.peek(3).unwrap(), 7);
        assert!(mem.bload_image(b"PLAIN TEXT", None).unwrap_err().is(ErrorCode::BadFileMode));
    }

    #[test]
    fn test_tandy_bsave_repeats_header() {
        let mut mem = AddressSpace::new(Config {
            syntax: Syntax::Tandy,
            ..Config::default()
        });
        mem.def_seg(Some(Val::Integer(0))).unwrap();
        let image = mem.bsave_image(1047, 1).unwrap();
        assert_eq!(image.len(), 7 + 1 + 7 + 1);
        assert_eq!(&image[8..15], &image[..7]);
        mem.poke(1047, 0).unwrap();
        let mut loaded = image.clone();
        loaded[7] = 0x55;
        mem.bload_image(&loaded, None).unwrap();
        assert_eq!(mem.peek(1047).unwrap(), 0x55);
    }
}
