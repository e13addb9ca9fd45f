//= [A Key Derivation Function](https://datatracker.ietf.org/doc/html/rfc3961#section-5.1) =//
//
// The input is replicated with a 13-bit right rotation per copy until the
// total length reaches lcm(|input| * 8, n) bits, then the copies are combined
// with one's-complement addition in n-bit chunks.

fn gcd(mut n1: usize, mut n2: usize) -> usize {
    while n2 != 0 {
        let r = n1 % n2;
        n1 = n2;
        n2 = r;
    }

    n1
}

fn lcm(n1: usize, n2: usize) -> usize {
    n1 * n2 / gcd(n1, n2)
}

// Bits are numbered MSB-first across the whole byte string.
fn get_bit(data: &[u8], pos: usize) -> u8 {
    (data[pos / 8] >> (7 - (pos % 8))) & 0x01
}

fn set_bit(data: &mut [u8], pos: usize, val: u8) {
    data[pos / 8] |= val << (7 - (pos % 8));
}

fn rotate_right(data: &[u8], n: usize, out: &mut [u8]) {
    let len = data.len() * 8;

    for i in 0..len {
        let val = get_bit(data, i);
        set_bit(out, (i + n) % len, val);
    }
}

// One's-complement addition: binary addition with the final carry wrapped
// back into the least significant bit.
fn ones_complement_add(n1: &[u8], n2: &[u8]) -> Vec<u8> {
    debug_assert_eq!(n1.len(), n2.len());

    let mut out = vec![0; n1.len()];
    let mut carry = 0_u16;

    for i in (0..n1.len()).rev() {
        let sum = u16::from(n1[i]) + u16::from(n2[i]) + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }

    // End-around carry: wrap the overflow back into the least significant
    // byte until it is absorbed.
    while carry != 0 {
        let mut i = out.len();
        while carry != 0 && i > 0 {
            i -= 1;
            let sum = u16::from(out[i]) + carry;
            out[i] = sum as u8;
            carry = sum >> 8;
        }
    }

    out
}

/// Stretches (or shrinks) `data` to exactly `n / 8` bytes. `n` must be a
/// multiple of 8.
pub fn n_fold(data: &[u8], n: usize) -> Vec<u8> {
    let data_bits = data.len() * 8;

    let lcm = lcm(n, data_bits);
    let replicate = lcm / data_bits;

    let mut replicated = vec![0; lcm / 8];

    for i in 0..replicate {
        rotate_right(data, 13 * i, &mut replicated[i * data.len()..(i + 1) * data.len()]);
    }

    let out_len = n / 8;
    let mut folded = vec![0; out_len];

    for chunk in replicated.chunks_exact(out_len) {
        folded = ones_complement_add(&folded, chunk);
    }

    folded
}
