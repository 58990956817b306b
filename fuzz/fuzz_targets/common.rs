const MAX_CHARS: usize = 64;

/// Letters the fuzzer picks from. Small on purpose so inputs share
/// characters and exercise moves, not just delete-all/insert-all.
const ALPHABET: &[char] = &['a', 'b', 'c', 'd', 'x', 'é', '字', ' '];

pub struct Pair {
  pub source: Vec<char>,
  pub target: Vec<char>,
}

pub fn pair_from_bytes(data: &[u8]) -> Pair {
  let mut cursor = ByteCursor::new(data);
  let source_len = cursor.next_usize(MAX_CHARS);
  let source = cursor.next_chars(source_len);
  let target_len = cursor.next_usize(MAX_CHARS);
  let target = cursor.next_chars(target_len);
  Pair { source, target }
}

struct ByteCursor<'a> {
  data: &'a [u8],
  pos:  usize,
}

impl<'a> ByteCursor<'a> {
  fn new(data: &'a [u8]) -> Self {
    Self { data, pos: 0 }
  }

  fn next_u8(&mut self) -> u8 {
    let value = self.data.get(self.pos).copied().unwrap_or(0);
    self.pos = self.pos.saturating_add(1);
    value
  }

  fn next_usize(&mut self, max_inclusive: usize) -> usize {
    self.next_u8() as usize % (max_inclusive + 1)
  }

  fn next_chars(&mut self, len: usize) -> Vec<char> {
    (0..len)
      .map(|_| ALPHABET[self.next_u8() as usize % ALPHABET.len()])
      .collect()
  }
}
