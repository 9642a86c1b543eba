use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::error::{Error, Result};
use crate::models::player::Player;
use crate::models::role::{Role, Team};
use crate::models::rule::RuleRow;

/// Builds the shuffled role assignment for a new game. Pure: the caller
/// persists the players. Seat index follows the order of `names`.
pub fn assign_roles(names: &[String], roles: &[String], row: &RuleRow) -> Result<Vec<Player>> {
    let specials = parse_specials(roles)?;
    check_composition(&specials)?;

    let mut sequence = vec![Role::Merlin, Role::Assassin];
    sequence.extend(&specials);

    let red = sequence.iter().filter(|r| r.team() == Team::Red).count();
    let blue = sequence.len() - red;
    if red > row.red {
        return Err(Error::TooManyRoles("red"));
    }
    if blue > row.blue {
        return Err(Error::TooManyRoles("blue"));
    }
    sequence.extend(std::iter::repeat(Role::Red).take(row.red - red));
    sequence.extend(std::iter::repeat(Role::Blue).take(row.blue - blue));
    debug_assert_eq!(sequence.len(), names.len());

    sequence.shuffle(&mut thread_rng());

    Ok(names
        .iter()
        .zip(sequence)
        .enumerate()
        .map(|(index, (name, role))| Player::new(name.clone(), index, role))
        .collect())
}

fn parse_specials(roles: &[String]) -> Result<Vec<Role>> {
    let mut specials = Vec::with_capacity(roles.len());
    for token in roles {
        let role: Role = token.parse()?;
        if !role.is_special() {
            return Err(Error::UnknownRole(token.clone()));
        }
        if specials.contains(&role) {
            return Err(Error::InvalidRoleComposition(format!(
                "role '{}' requested twice",
                role
            )));
        }
        specials.push(role);
    }
    Ok(specials)
}

fn check_composition(specials: &[Role]) -> Result<()> {
    let morgan = specials.contains(&Role::Morgan);
    let percival = specials.contains(&Role::Percival);
    if morgan && !percival {
        return Err(Error::InvalidRoleComposition(
            "morgan is in the game but percival is not".into(),
        ));
    }
    if percival && !morgan {
        return Err(Error::InvalidRoleComposition(
            "percival is in the game but morgan is not".into(),
        ));
    }
    Ok(())
}
