//! IP ⇄ SI conversions for BEC fields. BEC documents carry IP units; the
//! model is SI throughout.

const CFM_TO_M3S: f64 = 0.000_471_947_443;
const GPM_TO_M3S: f64 = 0.000_063_090_196;
const BTUH_TO_W: f64 = 0.293_071_070_2;
const IN_H2O_TO_PA: f64 = 249.0889;
const FT_H2O_TO_PA: f64 = 2989.067;
const HP_TO_W: f64 = 745.7;

pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) / 1.8
}

pub fn c_to_f(c: f64) -> f64 {
    c * 1.8 + 32.0
}

/// Temperature difference, °F → K.
pub fn delta_f_to_c(delta: f64) -> f64 {
    delta / 1.8
}

pub fn delta_c_to_f(delta: f64) -> f64 {
    delta * 1.8
}

pub fn cfm_to_m3s(cfm: f64) -> f64 {
    cfm * CFM_TO_M3S
}

pub fn m3s_to_cfm(m3s: f64) -> f64 {
    m3s / CFM_TO_M3S
}

pub fn gpm_to_m3s(gpm: f64) -> f64 {
    gpm * GPM_TO_M3S
}

pub fn m3s_to_gpm(m3s: f64) -> f64 {
    m3s / GPM_TO_M3S
}

pub fn btuh_to_w(btuh: f64) -> f64 {
    btuh * BTUH_TO_W
}

pub fn w_to_btuh(w: f64) -> f64 {
    w / BTUH_TO_W
}

pub fn in_h2o_to_pa(inches: f64) -> f64 {
    inches * IN_H2O_TO_PA
}

pub fn pa_to_in_h2o(pa: f64) -> f64 {
    pa / IN_H2O_TO_PA
}

pub fn ft_h2o_to_pa(feet: f64) -> f64 {
    feet * FT_H2O_TO_PA
}

pub fn pa_to_ft_h2o(pa: f64) -> f64 {
    pa / FT_H2O_TO_PA
}

pub fn kw_to_w(kw: f64) -> f64 {
    kw * 1000.0
}

pub fn w_to_kw(w: f64) -> f64 {
    w / 1000.0
}

pub fn hp_to_w(hp: f64) -> f64 {
    hp * HP_TO_W
}

pub fn w_to_hp(w: f64) -> f64 {
    w / HP_TO_W
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn temperatures_hit_fixed_points() {
        assert!(close(f_to_c(32.0), 0.0));
        assert!(close(f_to_c(212.0), 100.0));
        assert!(close(c_to_f(-40.0), -40.0));
        assert!(close(delta_f_to_c(18.0), 10.0));
    }

    #[test]
    fn flow_and_power_factors() {
        assert!(close(cfm_to_m3s(2118.88), 1.0));
        assert!((gpm_to_m3s(15_850.3) - 1.0).abs() < 1e-4);
        assert!((btuh_to_w(12_000.0) - 3516.85).abs() < 0.01);
        assert!(close(hp_to_w(1.0), 745.7));
        assert!(close(kw_to_w(2.5), 2500.0));
        assert!((in_h2o_to_pa(1.0) - 249.0889).abs() < 1e-9);
    }

    #[test]
    fn reverse_factors_undo_forward_ones() {
        for value in [0.0, 1.5, 400.0] {
            assert!(close(m3s_to_cfm(cfm_to_m3s(value)), value));
            assert!(close(w_to_btuh(btuh_to_w(value)), value));
            assert!(close(pa_to_ft_h2o(ft_h2o_to_pa(value)), value));
        }
    }
}
